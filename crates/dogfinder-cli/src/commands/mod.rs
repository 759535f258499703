//! Command handlers, one module per command family.
//!
//! Every handler that talks to the service first advances the session state
//! machine through [`require_session`].

pub(crate) mod auth;
pub(crate) mod favorites;
pub(crate) mod locations;
pub(crate) mod matching;
pub(crate) mod search;

use anyhow::anyhow;
use dogfinder_core::catalog::Catalog;
use dogfinder_core::clock::Clock;
use dogfinder_core::search::SearchTicket;
use dogfinder_core::session::{SessionController, SessionEvent, format_remaining};

use crate::cli::AppContext;
use crate::client::{CliError, CliResult};
use crate::output::render_page;
use crate::state::{self, AUTH_COOKIE_KEY};

pub(crate) const NOT_LOGGED_IN: &str =
    "not logged in; run `dogfinder login --name <name> --email <email>` first";
pub(crate) const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Restore the session and advance it to the current time.
///
/// Expired sessions are logged out before the error is returned; a session
/// inside the warning window prints the countdown and carries on.
pub(crate) async fn require_session(ctx: &AppContext) -> CliResult<SessionController> {
    let mut session = ctx.session_controller();
    if !session.is_authenticated() {
        return Err(CliError::validation(NOT_LOGGED_IN));
    }
    match session.tick(ctx.clock.now_ms()) {
        SessionEvent::Idle => {}
        SessionEvent::Warn { remaining_secs } => eprintln!(
            "Your session will expire in {}. Run `dogfinder session extend` to stay logged in.",
            format_remaining(remaining_secs)
        ),
        SessionEvent::Expire => {
            force_logout(ctx, &mut session).await;
            return Err(CliError::failure(anyhow!(SESSION_EXPIRED)));
        }
    }
    Ok(session)
}

/// Log out without surfacing remote failures.
pub(crate) async fn force_logout(ctx: &AppContext, session: &mut SessionController) {
    if let Err(err) = session.logout(&ctx.api).await {
        tracing::warn!(error = %err, "remote logout failed during forced logout");
    }
    ctx.session.remove(AUTH_COOKIE_KEY);
}

/// Catalog in the mode left by the previous invocation.
pub(crate) fn load_catalog(ctx: &AppContext) -> Catalog {
    Catalog::restore(ctx.local.clone(), ctx.session.clone()).resumed(state::view_mode(&ctx.local))
}

/// Run `ticket`, if any, and remember the match count for later paging.
pub(crate) async fn run_search(
    ctx: &AppContext,
    catalog: &mut Catalog,
    ticket: Option<SearchTicket>,
) -> CliResult<()> {
    if let Some(ticket) = ticket {
        catalog.run(&ctx.api, &ticket).await?;
        state::save_last_total(&ctx.local, catalog.search().total());
    }
    Ok(())
}

pub(crate) fn show_page(ctx: &AppContext, catalog: &Catalog) -> CliResult<()> {
    render_page(
        catalog.mode(),
        &catalog.page(),
        catalog.search().filters(),
        catalog.favorites().favorites(),
        ctx.output,
    )
}


#[cfg(test)]
mod tests {
    use super::test_support::{age_session, context, mock_login};
    use super::*;
    use anyhow::Result;
    use dogfinder_core::session::{AUTH_FLAG_KEY, SessionPhase};
    use httpmock::prelude::*;
    use tempfile::tempdir;

    use crate::cli::LoginArgs;
    use crate::commands::auth::handle_login;

    #[tokio::test]
    async fn commands_require_a_login() -> Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        let err = require_session(&ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), NOT_LOGGED_IN);
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_is_logged_out_before_failing() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        let logout = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/logout")
                .header("cookie", "fetch-access-token=token-1");
            then.status(200);
        });
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        handle_login(
            &ctx,
            LoginArgs {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        age_session(&ctx, 61)?;
        let err = require_session(&ctx).await.unwrap_err();
        assert_eq!(err.display_message(), SESSION_EXPIRED);
        logout.assert();
        assert!(ctx.session.read(AUTH_FLAG_KEY).is_none());
        assert!(ctx.session.read(AUTH_COOKIE_KEY).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn warning_window_still_runs_the_command() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        let dir = tempdir()?;
        let ctx = context(&server, &dir.path().join("state.json"))?;
        handle_login(
            &ctx,
            LoginArgs {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        age_session(&ctx, 57)?;
        let session = require_session(&ctx)
            .await
            .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        assert!(session.is_warning());
        assert_eq!(
            session.phase(ctx.clock.now_ms()),
            SessionPhase::ExpiringWarning
        );
        Ok(())
    }
}
