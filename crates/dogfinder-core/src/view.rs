//! Page composition for search and favorites modes.
//!
//! # Design
//! - Search mode shows the server page verbatim with server-driven metrics.
//! - Favorites mode applies every filter and the sort locally, then slices
//!   the same `[from, from + size)` window the server would have returned.
//! - Both modes share [`PageMetrics`] so pagination reads identically.

use std::cmp::Ordering;

use dogfinder_api_models::{Dog, SearchFilters, SortDirection, SortField};

use crate::favorites::Favorites;

/// Which source the visible page is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Server-paginated search results.
    #[default]
    Search,
    /// Locally filtered favorites.
    Favorites,
}

impl ViewMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Search => Self::Favorites,
            Self::Favorites => Self::Search,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Favorites => "favorites",
        }
    }

    /// Parse a name produced by [`ViewMode::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "search" => Some(Self::Search),
            "favorites" => Some(Self::Favorites),
            _ => None,
        }
    }
}

/// Pagination numbers for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    /// One-based page index.
    pub current_page: u64,
    /// Number of pages; 0 when there are no matches.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageMetrics {
    /// Metrics for `total` matches under the filters' offset and page size.
    #[must_use]
    pub fn compute(total: u64, filters: &SearchFilters) -> Self {
        let size = u64::from(filters.page_size());
        let current_page = u64::from(filters.from) / size + 1;
        let total_pages = total.div_ceil(size);
        Self {
            current_page,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}

/// The page to render, whichever mode produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Records on the page.
    pub dogs: Vec<Dog>,
    /// Matches across all pages.
    pub total: u64,
    /// One-based page index.
    pub current_page: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// Compose the visible page for `mode`.
///
/// `results`/`total` are the latest server page and count; they are ignored
/// in favorites mode.
#[must_use]
pub fn compose_page(
    mode: ViewMode,
    results: &[Dog],
    total: u64,
    favorites: &Favorites,
    filters: &SearchFilters,
) -> PageView {
    let (dogs, total) = match mode {
        ViewMode::Search => (results.to_vec(), total),
        ViewMode::Favorites => {
            let mut matching = filter_favorites(favorites.as_slice(), filters);
            sort_dogs(&mut matching, filters.sort.field, filters.sort.direction);
            let total = matching.len() as u64;
            (page_slice(matching, filters), total)
        }
    };
    let metrics = PageMetrics::compute(total, filters);
    PageView {
        dogs,
        total,
        current_page: metrics.current_page,
        total_pages: metrics.total_pages,
        has_next: metrics.has_next,
        has_prev: metrics.has_prev,
    }
}

/// Footer text under the result grid.
#[must_use]
pub fn pagination_label(mode: ViewMode, page: &PageView) -> String {
    match mode {
        ViewMode::Search => format!(
            "Page {} of {} ({} dogs)",
            page.current_page,
            page.total_pages.max(1),
            page.total
        ),
        ViewMode::Favorites => format!("Showing {} favorites", page.total),
    }
}

fn page_slice(dogs: Vec<Dog>, filters: &SearchFilters) -> Vec<Dog> {
    let from = usize::try_from(filters.from).unwrap_or(usize::MAX);
    let size = usize::try_from(filters.page_size()).unwrap_or(usize::MAX);
    dogs.into_iter().skip(from).take(size).collect()
}

/// Favorites passing every active filter (breed, inclusive age bounds, zip).
#[must_use]
pub fn filter_favorites(dogs: &[Dog], filters: &SearchFilters) -> Vec<Dog> {
    dogs.iter()
        .filter(|dog| filters.breeds.is_empty() || filters.breeds.contains(&dog.breed))
        .filter(|dog| filters.age_min.is_none_or(|min| dog.age >= min))
        .filter(|dog| filters.age_max.is_none_or(|max| dog.age <= max))
        .filter(|dog| {
            filters
                .zip_codes
                .as_ref()
                .is_none_or(|zips| zips.is_empty() || zips.contains(&dog.zip_code))
        })
        .cloned()
        .collect()
}

/// Stable sort by `field`; text compares case-insensitively, age numerically.
pub fn sort_dogs(dogs: &mut [Dog], field: SortField, direction: SortDirection) {
    dogs.sort_by(|left, right| {
        let ordering = compare_by(left, right, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(left: &Dog, right: &Dog, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(&left.name, &right.name),
        SortField::Breed => compare_text(&left.breed, &right.breed),
        SortField::Age => left.age.cmp(&right.age),
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Breed choices for the filter menu.
///
/// Search mode offers the service's breed list; favorites mode offers the
/// breeds present among favorites.
#[must_use]
pub fn breed_options(mode: ViewMode, remote_breeds: &[String], favorites: &Favorites) -> Vec<String> {
    match mode {
        ViewMode::Search => remote_breeds.to_vec(),
        ViewMode::Favorites => favorites.breeds(),
    }
}

/// Offset that avoids stranding the user on an empty favorites page.
///
/// Returns `None` when the current offset is fine.
#[must_use]
pub fn corrected_offset(favorites: &Favorites, filters: &SearchFilters) -> Option<u32> {
    let count = filter_favorites(favorites.as_slice(), filters).len() as u64;
    if count == 0 {
        return None;
    }
    let size = filters.page_size();
    let mut from = filters.from;
    while from > 0 && u64::from(from) >= count {
        from = from.saturating_sub(size);
    }
    (from != filters.from).then_some(from)
}

/// Filters to use when entering favorites mode.
///
/// A breed selection that names any breed absent from favorites is dropped,
/// and the offset returns to 0.
#[must_use]
pub fn enter_favorites_filters(filters: &SearchFilters, favorites: &Favorites) -> SearchFilters {
    let mut next = filters.clone();
    let available = favorites.breeds();
    if next.breeds.iter().any(|breed| !available.contains(breed)) {
        next.breeds.clear();
    }
    next.from = 0;
    next
}
