//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use dogfinder_api_models::{Dog, Location, LocationSearchResponse, SearchFilters};
use dogfinder_core::favorites::Favorites;
use dogfinder_core::view::{PageView, ViewMode, pagination_label};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageDocument<'a> {
    mode: &'static str,
    filters: &'a SearchFilters,
    total: u64,
    current_page: u64,
    total_pages: u64,
    has_next: bool,
    has_prev: bool,
    dogs: Vec<DogRow<'a>>,
}

#[derive(Serialize)]
struct DogRow<'a> {
    #[serde(flatten)]
    dog: &'a Dog,
    favorite: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_page(
    mode: ViewMode,
    page: &PageView,
    filters: &SearchFilters,
    favorites: &Favorites,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&PageDocument {
            mode: mode.as_str(),
            filters,
            total: page.total,
            current_page: page.current_page,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
            dogs: page
                .dogs
                .iter()
                .map(|dog| DogRow {
                    dog,
                    favorite: favorites.contains(&dog.id),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            if page.dogs.is_empty() {
                println!("{}", empty_message(mode));
            } else {
                print_dog_table(&page.dogs, Some(favorites));
            }
            println!("sort: {}", describe_sort(filters));
            println!("{}", pagination_label(mode, page));
            Ok(())
        }
    }
}

pub(crate) fn render_dogs(dogs: &[Dog], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(dogs),
        OutputFormat::Table => {
            if dogs.is_empty() {
                println!("No favorites yet.");
            } else {
                print_dog_table(dogs, None);
            }
            Ok(())
        }
    }
}

pub(crate) fn render_match(dog: &Dog, message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(dog),
        OutputFormat::Table => {
            println!("{message}");
            print_dog_table(std::slice::from_ref(dog), None);
            Ok(())
        }
    }
}

pub(crate) fn render_lines(lines: &[String], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(lines),
        OutputFormat::Table => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_locations(locations: &[Location], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(locations),
        OutputFormat::Table => {
            print_location_table(locations);
            Ok(())
        }
    }
}

pub(crate) fn render_location_search(
    response: &LocationSearchResponse,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Table => {
            print_location_table(&response.results);
            println!("{} of {} locations", response.results.len(), response.total);
            Ok(())
        }
    }
}

fn print_dog_table(dogs: &[Dog], favorites: Option<&Favorites>) {
    println!(
        "{:<24} {:<16} {:<28} {:>4} {:<6} FAV",
        "ID", "NAME", "BREED", "AGE", "ZIP"
    );
    for dog in dogs {
        let marker = match favorites {
            Some(favorites) if favorites.contains(&dog.id) => "*",
            _ => "",
        };
        println!(
            "{:<24} {:<16} {:<28} {:>4} {:<6} {}",
            dog.id,
            dog.name,
            dog.breed,
            dog.age_label(),
            dog.zip_code,
            marker
        );
    }
}

fn print_location_table(locations: &[Location]) {
    println!("{:<6} {:<24} {:<6} COUNTY", "ZIP", "CITY", "STATE");
    for location in locations {
        println!(
            "{:<6} {:<24} {:<6} {}",
            location.zip_code, location.city, location.state, location.county
        );
    }
}

#[must_use]
pub(crate) const fn empty_message(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Search => "No dogs match these filters.",
        ViewMode::Favorites => "No favorites match these filters.",
    }
}

#[must_use]
pub(crate) fn describe_sort(filters: &SearchFilters) -> String {
    format!(
        "{} ({})",
        filters.sort.field.label(),
        filters.sort.direction.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogfinder_api_models::{SortDirection, SortField, SortSpec};

    #[test]
    fn sort_description_uses_field_labels() {
        let filters = SearchFilters {
            sort: SortSpec::new(SortField::Age, SortDirection::Desc),
            ..SearchFilters::default()
        };
        assert_eq!(
            describe_sort(&filters),
            format!("{} (desc)", SortField::Age.label())
        );
    }

    #[test]
    fn json_rows_flatten_dogs_with_favorite_flag() -> anyhow::Result<()> {
        let dog = Dog {
            id: "a".into(),
            img: String::new(),
            name: "Rex".into(),
            age: 0,
            zip_code: "10001".into(),
            breed: "Pug".into(),
        };
        let row = serde_json::to_value(DogRow {
            dog: &dog,
            favorite: true,
        })?;
        assert_eq!(row["id"], "a");
        assert_eq!(row["zip_code"], "10001");
        assert_eq!(row["favorite"], true);
        Ok(())
    }

    #[test]
    fn empty_messages_differ_by_mode() {
        assert_ne!(
            empty_message(ViewMode::Search),
            empty_message(ViewMode::Favorites)
        );
    }
}
