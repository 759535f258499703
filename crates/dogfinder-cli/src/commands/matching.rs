use dogfinder_core::matching::{match_message, request_match};

use crate::cli::AppContext;
use crate::client::CliResult;
use crate::commands::{load_catalog, require_session};
use crate::output::render_match;

pub(crate) async fn handle_match(ctx: &AppContext) -> CliResult<()> {
    require_session(ctx).await?;
    let catalog = load_catalog(ctx);
    let dog = request_match(&ctx.api, catalog.favorites().favorites()).await?;
    tracing::info!(dog_id = %dog.id, "match generated");
    render_match(&dog, &match_message(&dog), ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::cli::{DogIdsArgs, LoginArgs};
    use crate::commands::auth::handle_login;
    use crate::commands::favorites::handle_favorites_add;
    use crate::commands::test_support::{context, dog_json, mock_login};

    #[tokio::test]
    async fn match_needs_favorites_then_resolves_one() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        server.mock(|when, then| {
            when.method(POST).path("/dogs").json_body(json!(["a", "b"]));
            then.status(200).json_body(json!([
                dog_json("a", "Ace", "Pug"),
                dog_json("b", "Bo", "Beagle")
            ]));
        });
        let matched = server.mock(|when, then| {
            when.method(POST).path("/dogs/match").json_body(json!(["a", "b"]));
            then.status(200).json_body(json!({"match": "b"}));
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
        .map_err(|err| anyhow!(err.display_message()))?;

        let err = handle_match(&ctx).await.unwrap_err();
        assert_eq!(
            err.display_message(),
            "Please select at least one dog to match with"
        );

        handle_favorites_add(
            &ctx,
            DogIdsArgs {
                ids: vec!["a".into(), "b".into()],
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        handle_match(&ctx)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        matched.assert();
        Ok(())
    }
}
