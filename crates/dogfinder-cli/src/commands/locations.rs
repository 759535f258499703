use dogfinder_core::api::DogApi;
use dogfinder_api_models::LocationSearchRequest;

use crate::cli::{AppContext, LocationSearchArgs, ZipArgs};
use crate::client::{CliError, CliResult};
use crate::commands::require_session;
use crate::output::{render_location_search, render_locations};

pub(crate) async fn handle_locations_lookup(ctx: &AppContext, args: ZipArgs) -> CliResult<()> {
    let zip_codes: Vec<String> = args
        .zip_codes
        .iter()
        .map(|zip| zip.trim().to_string())
        .filter(|zip| !zip.is_empty())
        .collect();
    if zip_codes.is_empty() {
        return Err(CliError::validation("at least one zip code is required"));
    }
    require_session(ctx).await?;
    let locations = ctx.api.locations(&zip_codes).await?;
    render_locations(&locations, ctx.output)
}

pub(crate) async fn handle_locations_search(
    ctx: &AppContext,
    args: LocationSearchArgs,
) -> CliResult<()> {
    let request = build_request(args)?;
    require_session(ctx).await?;
    let response = ctx.api.search_locations(&request).await?;
    render_location_search(&response, ctx.output)
}

fn build_request(args: LocationSearchArgs) -> CliResult<LocationSearchRequest> {
    let mut states = Vec::with_capacity(args.states.len());
    for state in args.states {
        let state = state.trim().to_ascii_uppercase();
        if state.len() != 2 || !state.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(CliError::validation(format!(
                "state '{state}' must be a two-letter abbreviation"
            )));
        }
        states.push(state);
    }
    Ok(LocationSearchRequest {
        city: args
            .city
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty()),
        states: (!states.is_empty()).then_some(states),
        geo_bounding_box: None,
        size: args.size,
        from: args.from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::cli::LoginArgs;
    use crate::commands::auth::handle_login;
    use crate::commands::test_support::{context, mock_login};

    #[test]
    fn states_are_normalised_and_checked() {
        let request = build_request(LocationSearchArgs {
            city: Some(" Austin ".into()),
            states: vec!["tx".into()],
            size: Some(5),
            from: None,
        })
        .map_err(|err| err.display_message());
        assert_eq!(
            request,
            Ok(LocationSearchRequest {
                city: Some("Austin".into()),
                states: Some(vec!["TX".into()]),
                size: Some(5),
                ..LocationSearchRequest::default()
            })
        );
        assert!(
            build_request(LocationSearchArgs {
                city: None,
                states: vec!["Texas".into()],
                size: None,
                from: None,
            })
            .is_err()
        );
    }

    #[tokio::test]
    async fn search_posts_the_request_body() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        let search = server.mock(|when, then| {
            when.method(POST)
                .path("/locations/search")
                .json_body(json!({"states": ["NY"], "size": 2}));
            then.status(200).json_body(json!({
                "results": [{
                    "zip_code": "10001",
                    "latitude": 40.75,
                    "longitude": -73.99,
                    "city": "New York",
                    "state": "NY",
                    "county": "New York"
                }],
                "total": 1
            }));
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
        handle_locations_search(
            &ctx,
            LocationSearchArgs {
                city: None,
                states: vec!["ny".into()],
                size: Some(2),
                from: None,
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        search.assert();
        Ok(())
    }
}
