//! Pure label and input helpers used by the components.

use dogfinder_api_models::{Dog, SearchFilters, SortDirection, SortField};
use dogfinder_core::search::available_sort_fields;
use dogfinder_core::session::format_remaining;
use dogfinder_core::view::ViewMode;

/// Badge text for a dog's age; puppies read `< 1`.
#[must_use]
pub fn age_badge(dog: &Dog) -> String {
    format!("Age {}", dog.age_label())
}

/// Label of the button switching between search and favorites.
#[must_use]
pub fn mode_toggle_label(mode: ViewMode, favorite_count: usize) -> String {
    match mode {
        ViewMode::Search => format!("View Favorites ({favorite_count})"),
        ViewMode::Favorites => "Back to Search".to_string(),
    }
}

/// Heart glyph and accessible label for a favorite toggle.
#[must_use]
pub const fn favorite_toggle(is_favorite: bool) -> (&'static str, &'static str) {
    if is_favorite {
        ("\u{2665}", "Remove from favorites")
    } else {
        ("\u{2661}", "Add to favorites")
    }
}

/// Label of the match button.
#[must_use]
pub fn match_button_label(favorite_count: usize) -> String {
    format!("Generate Match ({favorite_count})")
}

/// Sort fields offered in the dropdown with their labels.
#[must_use]
pub fn sort_field_options(filters: &SearchFilters) -> Vec<(SortField, &'static str)> {
    available_sort_fields(filters)
        .into_iter()
        .map(|field| (field, field.label()))
        .collect()
}

/// Text of the sort direction toggle.
#[must_use]
pub const fn sort_direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "Ascending \u{2191}",
        SortDirection::Desc => "Descending \u{2193}",
    }
}

/// Countdown shown in the expiry banner.
#[must_use]
pub fn session_warning_text(remaining_secs: u64) -> String {
    format!(
        "Your session will expire in {}.",
        format_remaining(remaining_secs)
    )
}

/// Parse an age bound typed by the user; blank or invalid input means unset.
#[must_use]
pub fn parse_age_input(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Text placed in an age input for a bound.
#[must_use]
pub fn age_input_value(bound: Option<u32>) -> String {
    bound.map(|age| age.to_string()).unwrap_or_default()
}

/// Message shown when the grid is empty.
#[must_use]
pub const fn empty_results_message(mode: ViewMode, has_filters: bool) -> &'static str {
    match (mode, has_filters) {
        (ViewMode::Favorites, false) => "You haven't added any favorites yet.",
        (ViewMode::Favorites, true) => "No favorites match these filters.",
        (ViewMode::Search, _) => "No dogs found. Try adjusting your filters.",
    }
}
