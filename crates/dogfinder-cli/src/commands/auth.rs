use anyhow::anyhow;
use dogfinder_core::clock::Clock;
use dogfinder_core::session::{
    ExtensionOutcome, SessionError, SessionPhase, format_remaining,
};
use serde::Serialize;

use crate::cli::{AppContext, LoginArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{NOT_LOGGED_IN, SESSION_EXPIRED, force_logout};
use crate::state::AUTH_COOKIE_KEY;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let mut session = ctx.session_controller();
    match session
        .login(&ctx.api, &ctx.clock, &args.name, &args.email)
        .await
    {
        Ok(()) => {}
        Err(SessionError::Api(err)) => {
            ctx.session.remove(AUTH_COOKIE_KEY);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    let name = session.user().map_or("", |user| user.name.as_str());
    let minutes = ctx.timing.duration_ms / 60_000;
    println!("Logged in as {name}. The session lasts {minutes} minutes.");
    Ok(())
}

pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    let mut session = ctx.session_controller();
    let result = session.logout(&ctx.api).await;
    ctx.session.remove(AUTH_COOKIE_KEY);
    match result {
        Ok(()) => println!("Logged out."),
        Err(err) => eprintln!("warning: remote logout failed ({err}); local session cleared"),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus<'a> {
    phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    remaining_secs: u64,
}

const fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Anonymous => "anonymous",
        SessionPhase::Authenticated => "authenticated",
        SessionPhase::ExpiringWarning => "expiring",
        SessionPhase::Expired => "expired",
    }
}

pub(crate) fn handle_session_status(ctx: &AppContext) -> CliResult<()> {
    let session = ctx.session_controller();
    let now = ctx.clock.now_ms();
    let status = SessionStatus {
        phase: phase_label(session.phase(now)),
        user: session.user().map(|user| user.name.as_str()),
        email: session.user().map(|user| user.email.as_str()),
        remaining_secs: session.remaining_secs(now),
    };

    match ctx.output {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&status)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            println!("status: {}", status.phase);
            if let (Some(user), Some(email)) = (status.user, status.email) {
                println!("user: {user} <{email}>");
            }
            if status.remaining_secs > 0 {
                println!("expires in: {}", format_remaining(status.remaining_secs));
            }
        }
    }
    Ok(())
}

pub(crate) async fn handle_session_extend(ctx: &AppContext) -> CliResult<()> {
    let mut session = ctx.session_controller();
    match session.phase(ctx.clock.now_ms()) {
        SessionPhase::Anonymous => return Err(CliError::validation(NOT_LOGGED_IN)),
        SessionPhase::Expired => {
            force_logout(ctx, &mut session).await;
            return Err(CliError::failure(anyhow!(SESSION_EXPIRED)));
        }
        SessionPhase::Authenticated | SessionPhase::ExpiringWarning => {}
    }

    match session.extend(&ctx.api, &ctx.clock).await {
        ExtensionOutcome::Extended => {
            println!(
                "Session extended; expires in {}.",
                format_remaining(session.remaining_secs(ctx.clock.now_ms()))
            );
            Ok(())
        }
        ExtensionOutcome::ReauthRequired => {
            force_logout(ctx, &mut session).await;
            Err(CliError::failure(anyhow!(
                "the session could not be refreshed; please log in again"
            )))
        }
        ExtensionOutcome::Failed => Err(CliError::failure(anyhow!(
            "failed to extend the session; try again"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dogfinder_core::session::{AUTH_FLAG_KEY, LOGIN_TIME_KEY, USER_EMAIL_KEY};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::commands::test_support::{age_session, context, mock_login};

    fn ada() -> LoginArgs {
        LoginArgs {
            name: " Ada ".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn login_persists_session_and_cookie() -> Result<()> {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"name": "Ada", "email": "ada@example.com"}));
            then.status(200)
                .header("set-cookie", "fetch-access-token=token-1; HttpOnly")
                .body("OK");
        });
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;

        handle_login(&ctx, ada())
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        login.assert();
        assert_eq!(ctx.session.read(AUTH_FLAG_KEY).as_deref(), Some("true"));
        assert_eq!(
            ctx.session.read(USER_EMAIL_KEY).as_deref(),
            Some("ada@example.com")
        );
        assert_eq!(
            ctx.session.read(AUTH_COOKIE_KEY).as_deref(),
            Some("fetch-access-token=token-1")
        );
        Ok(())
    }

    #[tokio::test]
    async fn blank_fields_fail_validation_offline() -> Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        let err = handle_login(
            &ctx,
            LoginArgs {
                name: "Ada".into(),
                email: "  ".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Please fill in all fields");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_clears_local_state() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401);
        });
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        ctx.session.write(AUTH_COOKIE_KEY, "fetch-access-token=stale")?;

        let err = handle_login(&ctx, ada()).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(ctx.session.read(AUTH_FLAG_KEY).is_none());
        assert!(ctx.session.read(AUTH_COOKIE_KEY).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_even_when_the_service_errors() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        server.mock(|when, then| {
            when.method(POST).path("/auth/logout");
            then.status(500);
        });
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        handle_login(&ctx, ada())
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        handle_logout(&ctx)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        assert!(ctx.session.read(AUTH_FLAG_KEY).is_none());
        assert!(ctx.session.read(LOGIN_TIME_KEY).is_none());
        assert!(ctx.session.read(AUTH_COOKIE_KEY).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn extend_relogs_with_stored_credentials() -> Result<()> {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"name": "Ada", "email": "ada@example.com"}));
            then.status(200)
                .header("set-cookie", "fetch-access-token=token-1; HttpOnly")
                .body("OK");
        });
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        handle_login(&ctx, ada())
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        age_session(&ctx, 58)?;

        handle_session_extend(&ctx)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        login.assert_calls(2);
        let session = ctx.session_controller();
        assert_eq!(
            session.phase(ctx.clock.now_ms()),
            SessionPhase::Authenticated
        );
        Ok(())
    }

    #[tokio::test]
    async fn extend_with_rejected_credentials_forces_logout() -> Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        ctx.session.write(AUTH_FLAG_KEY, "true")?;
        ctx.session
            .write(LOGIN_TIME_KEY, &ctx.clock.now_ms().to_string())?;

        let err = handle_session_extend(&ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(ctx.session.read(AUTH_FLAG_KEY).is_none());
        Ok(())
    }
}
