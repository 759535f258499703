use dogfinder_core::api::DogApi;
use dogfinder_api_models::Dog;

use crate::cli::{AppContext, DogIdArgs, DogIdsArgs};
use crate::client::{CliError, CliResult};
use crate::commands::{load_catalog, require_session};
use crate::output::render_dogs;

pub(crate) async fn handle_favorites_list(ctx: &AppContext) -> CliResult<()> {
    require_session(ctx).await?;
    let catalog = load_catalog(ctx);
    render_dogs(catalog.favorites().favorites().as_slice(), ctx.output)
}

pub(crate) async fn handle_favorites_add(ctx: &AppContext, args: DogIdsArgs) -> CliResult<()> {
    let ids = clean_ids(args.ids)?;
    require_session(ctx).await?;
    let fetched = ctx.api.fetch_dogs(&ids).await?;
    let missing = missing_ids(&ids, &fetched);
    if fetched.is_empty() {
        return Err(CliError::validation(format!(
            "no dogs found for: {}",
            missing.join(", ")
        )));
    }
    if !missing.is_empty() {
        eprintln!("warning: skipped unknown ids: {}", missing.join(", "));
    }

    let mut catalog = load_catalog(ctx);
    for dog in fetched {
        println!("Added {} ({}) to favorites.", dog.name, dog.id);
        catalog.add_favorite(dog);
    }
    println!("{} favorites.", catalog.favorites().favorites().len());
    Ok(())
}

pub(crate) async fn handle_favorites_remove(ctx: &AppContext, args: DogIdsArgs) -> CliResult<()> {
    let ids = clean_ids(args.ids)?;
    require_session(ctx).await?;
    let mut catalog = load_catalog(ctx);
    let mut unknown = Vec::new();
    for id in ids {
        if catalog.remove_favorite(&id) {
            println!("Removed {id} from favorites.");
        } else {
            unknown.push(id);
        }
    }
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "not in favorites: {}",
            unknown.join(", ")
        )))
    }
}

pub(crate) async fn handle_favorites_toggle(ctx: &AppContext, args: DogIdArgs) -> CliResult<()> {
    let mut ids = clean_ids(vec![args.id])?;
    require_session(ctx).await?;
    let mut catalog = load_catalog(ctx);
    let id = ids.remove(0);

    let dog = match catalog.favorites().favorites().get(&id) {
        Some(dog) => dog.clone(),
        None => ctx
            .api
            .fetch_dogs(std::slice::from_ref(&id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CliError::validation(format!("no dog found for: {id}")))?,
    };
    let name = dog.name.clone();
    if catalog.toggle_favorite(dog) {
        println!("Added {name} ({id}) to favorites.");
    } else {
        println!("Removed {name} ({id}) from favorites.");
    }
    Ok(())
}

fn clean_ids(ids: Vec<String>) -> CliResult<Vec<String>> {
    let ids: Vec<String> = ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        Err(CliError::validation("at least one dog id is required"))
    } else {
        Ok(ids)
    }
}

fn missing_ids(requested: &[String], fetched: &[Dog]) -> Vec<String> {
    requested
        .iter()
        .filter(|id| !fetched.iter().any(|dog| &dog.id == *id))
        .cloned()
        .collect()
}
