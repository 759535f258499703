use dogfinder_core::api::DogApi;
use dogfinder_core::catalog::Catalog;
use dogfinder_core::search::FilterChange;
use dogfinder_core::view::{PageMetrics, ViewMode};

use crate::cli::{AppContext, PageStep, SearchArgs};
use crate::client::{CliError, CliResult};
use crate::commands::{load_catalog, require_session, run_search, show_page};
use crate::output::render_lines;
use crate::state;

pub(crate) async fn handle_breeds(ctx: &AppContext) -> CliResult<()> {
    require_session(ctx).await?;
    let catalog = load_catalog(ctx);
    let remote = match catalog.mode() {
        ViewMode::Search => ctx.api.breeds().await?,
        ViewMode::Favorites => Vec::new(),
    };
    render_lines(&catalog.breed_options(&remote), ctx.output)
}

pub(crate) async fn handle_search(ctx: &AppContext, args: SearchArgs) -> CliResult<()> {
    validate_search_args(&args)?;
    require_session(ctx).await?;

    let mut catalog = load_catalog(ctx);
    if args.favorites {
        catalog.enter_mode(ViewMode::Favorites);
    } else if args.all {
        catalog.enter_mode(ViewMode::Search);
    }
    state::save_view_mode(&ctx.local, catalog.mode());

    apply_search_args(&mut catalog, &args);
    let ticket = catalog.initial_search();
    run_search(ctx, &mut catalog, ticket).await?;
    show_page(ctx, &catalog)
}

pub(crate) async fn handle_page(ctx: &AppContext, step: PageStep) -> CliResult<()> {
    require_session(ctx).await?;
    let mut catalog = load_catalog(ctx);
    let before = catalog.search().filters().from;

    let ticket = match (catalog.mode(), step) {
        (ViewMode::Search, PageStep::Next) => {
            let total = state::last_total(&ctx.local).ok_or_else(|| {
                CliError::validation("no search results yet; run `dogfinder search` first")
            })?;
            let filters = catalog.search().filters();
            if !PageMetrics::compute(total, filters).has_next {
                return Err(CliError::validation(boundary_message(step)));
            }
            let next = filters.from.saturating_add(filters.page_size());
            catalog.apply(FilterChange::From(next))
        }
        (_, PageStep::Next) => catalog.next_page(),
        (_, PageStep::Prev) => catalog.prev_page(),
    };

    if catalog.search().filters().from == before {
        return Err(CliError::validation(boundary_message(step)));
    }
    run_search(ctx, &mut catalog, ticket).await?;
    show_page(ctx, &catalog)
}

const fn boundary_message(step: PageStep) -> &'static str {
    match step {
        PageStep::Next => "already on the last page",
        PageStep::Prev => "already on the first page",
    }
}

fn validate_search_args(args: &SearchArgs) -> CliResult<()> {
    if let (Some(min), Some(max)) = (args.age_min, args.age_max)
        && min > max
    {
        return Err(CliError::validation(
            "--age-min must not be greater than --age-max",
        ));
    }
    if args.size == Some(0) {
        return Err(CliError::validation("--size must be at least 1"));
    }
    Ok(())
}

/// Apply the filter flags in order: clear, breeds, ages, zip, sort, size.
fn apply_search_args(catalog: &mut Catalog, args: &SearchArgs) {
    if args.clear {
        catalog.clear_filters();
    }
    if !args.breeds.is_empty() {
        catalog.apply(FilterChange::Breeds(args.breeds.clone()));
    } else if args.any_breed {
        catalog.apply(FilterChange::Breeds(Vec::new()));
    }
    if args.age_min.is_some() || args.age_max.is_some() {
        let current = catalog.search().filters();
        let change = FilterChange::AgeRange {
            min: args.age_min.or(current.age_min),
            max: args.age_max.or(current.age_max),
        };
        catalog.apply(change);
    }
    if let Some(zip) = &args.zip {
        catalog.set_zip_code(Some(zip));
    }
    if let Some(sort) = args.sort {
        catalog.apply(FilterChange::Sort(sort));
    } else if args.toggle_sort {
        catalog.toggle_sort();
    }
    if let Some(size) = args.size {
        catalog.apply(FilterChange::Size(size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use dogfinder_api_models::{SortDirection, SortField, SortSpec};
    use dogfinder_core::storage::StorageHandle;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::cli::LoginArgs;
    use crate::commands::auth::handle_login;
    use crate::commands::test_support::{context, dog_json, mock_login};

    fn catalog() -> Catalog {
        Catalog::restore(StorageHandle::memory(), StorageHandle::memory())
    }

    #[test]
    fn flags_apply_in_order_and_keep_unset_bounds() {
        let mut catalog = catalog();
        catalog.apply(FilterChange::AgeRange {
            min: Some(1),
            max: Some(8),
        });
        apply_search_args(
            &mut catalog,
            &SearchArgs {
                breeds: vec!["Pug".into()],
                age_max: Some(5),
                zip: Some(" 10001 ".into()),
                ..SearchArgs::default()
            },
        );
        let filters = catalog.search().filters();
        assert_eq!(filters.breeds, vec!["Pug"]);
        assert_eq!(filters.age_min, Some(1));
        assert_eq!(filters.age_max, Some(5));
        assert_eq!(filters.zip_codes, Some(vec!["10001".to_string()]));
        assert_eq!(filters.sort.field, SortField::Name);
    }

    #[test]
    fn clear_runs_before_new_flags() {
        let mut catalog = catalog();
        catalog.apply(FilterChange::Breeds(vec!["Pug".into()]));
        apply_search_args(
            &mut catalog,
            &SearchArgs {
                clear: true,
                sort: Some(SortSpec::new(SortField::Age, SortDirection::Desc)),
                ..SearchArgs::default()
            },
        );
        let filters = catalog.search().filters();
        assert!(filters.breeds.is_empty());
        assert_eq!(filters.sort.to_string(), "age:desc");
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        let err = validate_search_args(&SearchArgs {
            age_min: Some(9),
            age_max: Some(2),
            ..SearchArgs::default()
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn search_then_next_walks_remote_pages() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_login(&server);
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/dogs/search")
                .query_param("from", "0")
                .query_param("breeds", "Pug");
            then.status(200)
                .json_body(json!({"resultIds": ["a"], "total": 13}));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/dogs/search")
                .query_param("from", "12")
                .query_param("breeds", "Pug");
            then.status(200)
                .json_body(json!({"resultIds": ["b"], "total": 13}));
        });
        let hydrate_a = server.mock(|when, then| {
            when.method(POST).path("/dogs").json_body(json!(["a"]));
            then.status(200).json_body(json!([dog_json("a", "Ace", "Pug")]));
        });
        let hydrate_b = server.mock(|when, then| {
            when.method(POST).path("/dogs").json_body(json!(["b"]));
            then.status(200).json_body(json!([dog_json("b", "Bo", "Pug")]));
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

        handle_search(
            &ctx,
            SearchArgs {
                breeds: vec!["Pug".into()],
                ..SearchArgs::default()
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(state::last_total(&ctx.local), Some(13));

        handle_page(&ctx, PageStep::Next)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        let err = handle_page(&ctx, PageStep::Next).await.unwrap_err();
        assert_eq!(err.display_message(), "already on the last page");

        first.assert();
        second.assert();
        hydrate_a.assert();
        hydrate_b.assert();
        assert_eq!(load_catalog(&ctx).search().filters().from, 12);
        Ok(())
    }

    #[tokio::test]
    async fn favorites_mode_pages_without_the_service() -> Result<()> {
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
        .map_err(|err| anyhow!(err.display_message()))?;

        let mut catalog = load_catalog(&ctx);
        for index in 0..14 {
            catalog.add_favorite(dogfinder_api_models::Dog {
                id: format!("fav-{index:02}"),
                img: String::new(),
                name: format!("Fav {index:02}"),
                age: 2,
                zip_code: "10001".into(),
                breed: "Pug".into(),
            });
        }

        handle_search(
            &ctx,
            SearchArgs {
                favorites: true,
                ..SearchArgs::default()
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        handle_page(&ctx, PageStep::Next)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        let resumed = load_catalog(&ctx);
        assert_eq!(resumed.mode(), ViewMode::Favorites);
        assert_eq!(resumed.page().dogs.len(), 2);
        assert!(handle_page(&ctx, PageStep::Next).await.is_err());
        Ok(())
    }
}
