//! Search controller: filter state, remote paging and result hydration.
//!
//! # Design
//! - Filters are persisted to durable storage after every change and
//!   normalised on restore.
//! - Every filter change except explicit paging resets the offset to 0.
//! - Each remote search carries a [`SearchTicket`]; completions for anything
//!   but the most recently issued ticket are discarded so a slow response can
//!   never overwrite a newer one.

use dogfinder_api_models::{
    DEFAULT_PAGE_SIZE, Dog, SearchFilters, SortDirection, SortField, SortSpec,
};

use crate::api::{ApiError, ApiResult, DogApi};
use crate::storage::StorageHandle;
use crate::view::PageMetrics;

/// Durable-storage key holding the persisted filters.
pub const FILTERS_KEY: &str = "search_filters";

/// A single user-driven edit to the search filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Replace the breed selection.
    Breeds(Vec<String>),
    /// Replace both age bounds.
    AgeRange {
        /// Inclusive minimum.
        min: Option<u32>,
        /// Inclusive maximum.
        max: Option<u32>,
    },
    /// Replace the zip code list.
    ZipCodes(Option<Vec<String>>),
    /// Replace the sort specification.
    Sort(SortSpec),
    /// Jump to an offset. The only change that keeps paging position.
    From(u32),
    /// Change the page size.
    Size(u32),
    /// Reset breeds, ages, zips and sort; page size is kept.
    Clear,
}

/// Apply `change` to `filters` and normalise the result.
#[must_use]
pub fn apply_filter_change(filters: &SearchFilters, change: FilterChange) -> SearchFilters {
    let mut next = filters.clone();
    match change {
        FilterChange::Breeds(breeds) => next.breeds = breeds,
        FilterChange::AgeRange { min, max } => {
            next.age_min = min;
            next.age_max = max;
        }
        FilterChange::ZipCodes(zip_codes) => {
            next.zip_codes = zip_codes.filter(|zips| !zips.is_empty());
        }
        FilterChange::Sort(sort) => next.sort = sort,
        FilterChange::From(from) => next.from = from,
        FilterChange::Size(size) => next.size = size,
        FilterChange::Clear => {
            next.breeds.clear();
            next.age_min = None;
            next.age_max = None;
            next.zip_codes = None;
            next.sort = SortSpec::default();
        }
    }
    if !only_offset_changed(filters, &next) {
        next.from = 0;
    }
    normalize(next)
}

fn only_offset_changed(before: &SearchFilters, after: &SearchFilters) -> bool {
    before.breeds == after.breeds
        && before.age_min == after.age_min
        && before.age_max == after.age_max
        && before.zip_codes == after.zip_codes
        && before.sort == after.sort
        && before.size == after.size
}

/// Normalise persisted or edited filters.
///
/// A zero page size falls back to the default, and a breed sort with exactly
/// one breed selected switches to sorting by name.
#[must_use]
pub fn normalize(mut filters: SearchFilters) -> SearchFilters {
    if filters.size == 0 {
        filters.size = DEFAULT_PAGE_SIZE;
    }
    if filters.breeds.len() == 1 && filters.sort.field == SortField::Breed {
        filters.sort = filters.sort.with_field(SortField::Name);
    }
    filters
}

/// Sort fields offered for the current selection.
///
/// Breed is hidden while exactly one breed is selected.
#[must_use]
pub fn available_sort_fields(filters: &SearchFilters) -> Vec<SortField> {
    SortField::all()
        .into_iter()
        .filter(|field| !(filters.breeds.len() == 1 && *field == SortField::Breed))
        .collect()
}

/// Map a single free-text zip entry to the zip filter.
#[must_use]
pub fn zip_filter(zip: Option<&str>) -> Option<Vec<String>> {
    zip.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| vec![value.to_string()])
}

/// One page of hydrated search results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    /// Hydrated records in service order.
    pub dogs: Vec<Dog>,
    /// Total matches across all pages.
    pub total: u64,
}

/// Search the service and hydrate the returned id page.
///
/// # Errors
///
/// Returns the first [`ApiError`] raised by either call.
pub async fn fetch_results(api: &dyn DogApi, filters: &SearchFilters) -> ApiResult<SearchOutcome> {
    let response = api.search_dogs(filters).await?;
    if response.result_ids.is_empty() {
        return Ok(SearchOutcome {
            dogs: Vec::new(),
            total: response.total,
        });
    }
    let dogs = api.fetch_dogs(&response.result_ids).await?;
    Ok(SearchOutcome {
        dogs,
        total: response.total,
    })
}

/// Handle for one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Monotonic issue number.
    pub generation: u64,
    /// Filters the search was issued with.
    pub filters: SearchFilters,
}

/// Filter state plus the latest remote results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchController {
    store: StorageHandle,
    filters: SearchFilters,
    results: Vec<Dog>,
    total: u64,
    searching: bool,
    issued: u64,
    last_error: Option<ApiError>,
}

impl SearchController {
    /// Restore persisted filters from `store`, falling back to defaults.
    #[must_use]
    pub fn restore(store: StorageHandle) -> Self {
        let filters = store
            .load_json::<SearchFilters>(FILTERS_KEY)
            .map(normalize)
            .unwrap_or_default();
        Self {
            store,
            filters,
            results: Vec::new(),
            total: 0,
            searching: false,
            issued: 0,
            last_error: None,
        }
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Records from the last accepted search.
    #[must_use]
    pub fn results(&self) -> &[Dog] {
        &self.results
    }

    /// Server-reported total from the last accepted search.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether the latest issued search is still outstanding.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Error from the latest failed search, cleared on the next success.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Server-driven page metrics.
    #[must_use]
    pub fn metrics(&self) -> PageMetrics {
        PageMetrics::compute(self.total, &self.filters)
    }

    /// One-based page index derived from the offset.
    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.metrics().current_page
    }

    /// Page count derived from the server total.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.metrics().total_pages
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.metrics().has_next
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.metrics().has_prev
    }

    /// Apply a filter change and persist it. Returns whether anything changed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let next = apply_filter_change(&self.filters, change);
        if next == self.filters {
            return false;
        }
        self.filters = next;
        self.store.persist_json(FILTERS_KEY, &self.filters);
        true
    }

    /// Advance the offset by one page.
    pub fn next_page(&mut self) -> bool {
        let from = self.filters.from.saturating_add(self.filters.page_size());
        self.apply(FilterChange::From(from))
    }

    /// Step the offset back by one page, clamped at 0.
    pub fn prev_page(&mut self) -> bool {
        let from = self.filters.from.saturating_sub(self.filters.page_size());
        self.apply(FilterChange::From(from))
    }

    /// Flip the direction of the current sort field.
    pub fn toggle_sort(&mut self) -> bool {
        self.apply(FilterChange::Sort(self.filters.sort.toggled()))
    }

    /// Change the sort field, keeping the direction.
    pub fn set_sort_field(&mut self, field: SortField) -> bool {
        self.apply(FilterChange::Sort(self.filters.sort.with_field(field)))
    }

    /// Set the sort direction, keeping the field.
    pub fn set_sort_direction(&mut self, direction: SortDirection) -> bool {
        self.apply(FilterChange::Sort(SortSpec::new(
            self.filters.sort.field,
            direction,
        )))
    }

    /// Filter by a single zip code; blank clears the zip filter.
    pub fn set_zip_code(&mut self, zip: Option<&str>) -> bool {
        self.apply(FilterChange::ZipCodes(zip_filter(zip)))
    }

    /// Drop every filter and restore the default sort.
    pub fn clear_filters(&mut self) -> bool {
        self.apply(FilterChange::Clear)
    }

    /// Mark a new search as issued for the current filters.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.issued += 1;
        self.searching = true;
        SearchTicket {
            generation: self.issued,
            filters: self.filters.clone(),
        }
    }

    /// Record the result of the search issued with `ticket`.
    ///
    /// Returns `Ok(true)` when the results were applied and `Ok(false)` when
    /// a newer search has been issued since.
    ///
    /// # Errors
    ///
    /// Returns the search error when the current search failed; previous
    /// results are kept.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: ApiResult<SearchOutcome>,
    ) -> Result<bool, ApiError> {
        if ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "discarding stale search response"
            );
            return Ok(false);
        }
        self.searching = false;
        match result {
            Ok(outcome) => {
                self.results = outcome.dogs;
                self.total = outcome.total;
                self.last_error = None;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Issue, await and record a search in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::complete_search`].
    pub async fn run(&mut self, api: &dyn DogApi) -> Result<bool, ApiError> {
        let ticket = self.begin_search();
        let result = fetch_results(api, &ticket.filters).await;
        self.complete_search(&ticket, result)
    }

    pub(crate) fn set_filters(&mut self, filters: SearchFilters) -> bool {
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.store.persist_json(FILTERS_KEY, &self.filters);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SearchController {
        SearchController::restore(StorageHandle::memory())
    }

    #[test]
    fn defaults_when_nothing_is_stored() {
        let search = controller();
        assert_eq!(search.filters(), &SearchFilters::default());
        assert_eq!(search.current_page(), 1);
        assert_eq!(search.total_pages(), 0);
    }

    #[test]
    fn filter_changes_reset_the_offset() {
        let mut search = controller();
        search.apply(FilterChange::From(36));
        assert_eq!(search.filters().from, 36);

        search.apply(FilterChange::AgeRange {
            min: Some(1),
            max: None,
        });
        assert_eq!(search.filters().from, 0);

        for change in [
            FilterChange::Breeds(vec!["Pug".into(), "Beagle".into()]),
            FilterChange::ZipCodes(Some(vec!["10001".into()])),
            FilterChange::Sort("age:desc".parse().unwrap()),
            FilterChange::Size(24),
        ] {
            search.apply(FilterChange::From(48));
            search.apply(change);
            assert_eq!(search.filters().from, 0);
        }
    }

    #[test]
    fn paging_is_clamped_at_zero() {
        let mut search = controller();
        assert!(!search.prev_page());
        assert!(search.next_page());
        assert!(search.next_page());
        assert_eq!(search.filters().from, 24);
        search.prev_page();
        assert_eq!(search.filters().from, 12);
    }

    #[test]
    fn single_breed_switches_sort_to_name() {
        let mut search = controller();
        search.toggle_sort();
        search.apply(FilterChange::Breeds(vec!["Pug".into()]));
        assert_eq!(search.filters().sort.field, SortField::Name);
        assert_eq!(search.filters().sort.direction, SortDirection::Desc);

        search.apply(FilterChange::Breeds(vec!["Pug".into(), "Beagle".into()]));
        assert_eq!(search.filters().sort.field, SortField::Name);
    }

    #[test]
    fn sort_helpers_keep_the_other_half() {
        let mut search = controller();
        search.set_sort_field(SortField::Age);
        assert_eq!(search.filters().sort.to_string(), "age:asc");
        search.toggle_sort();
        assert_eq!(search.filters().sort.to_string(), "age:desc");
        search.set_sort_direction(SortDirection::Asc);
        assert_eq!(search.filters().sort.to_string(), "age:asc");
    }

    #[test]
    fn zip_entry_is_trimmed_and_blank_clears() {
        let mut search = controller();
        search.set_zip_code(Some(" 10001 "));
        assert_eq!(search.filters().zip_codes, Some(vec!["10001".to_string()]));
        search.set_zip_code(Some("   "));
        assert_eq!(search.filters().zip_codes, None);
    }

    #[test]
    fn clear_keeps_page_size() {
        let mut search = controller();
        search.apply(FilterChange::Size(24));
        search.apply(FilterChange::Breeds(vec!["Pug".into()]));
        search.set_sort_field(SortField::Age);
        search.apply(FilterChange::From(48));
        search.clear_filters();
        let filters = search.filters();
        assert!(filters.breeds.is_empty());
        assert_eq!(filters.sort, SortSpec::default());
        assert_eq!(filters.size, 24);
        assert_eq!(filters.from, 0);
    }

    #[test]
    fn filters_persist_and_restore_normalised() {
        let store = StorageHandle::memory();
        let mut search = SearchController::restore(store.clone());
        search.apply(FilterChange::AgeRange {
            min: Some(2),
            max: Some(8),
        });
        let restored = SearchController::restore(store.clone());
        assert_eq!(restored.filters().age_min, Some(2));

        store
            .write(
                FILTERS_KEY,
                r#"{"breeds":["Pug"],"sort":"breed:desc","from":12,"size":0}"#,
            )
            .unwrap();
        let restored = SearchController::restore(store);
        assert_eq!(restored.filters().size, DEFAULT_PAGE_SIZE);
        assert_eq!(restored.filters().sort.to_string(), "name:desc");
        assert_eq!(restored.filters().from, 12);
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut search = controller();
        let first = search.begin_search();
        let second = search.begin_search();
        let newer = SearchOutcome {
            dogs: Vec::new(),
            total: 7,
        };
        assert_eq!(search.complete_search(&second, Ok(newer)), Ok(true));
        let older = SearchOutcome {
            dogs: Vec::new(),
            total: 99,
        };
        assert_eq!(search.complete_search(&first, Ok(older)), Ok(false));
        assert_eq!(search.total(), 7);
        assert!(!search.is_searching());
    }

    #[test]
    fn failures_keep_previous_results() {
        let mut search = controller();
        let ticket = search.begin_search();
        search
            .complete_search(
                &ticket,
                Ok(SearchOutcome {
                    dogs: Vec::new(),
                    total: 30,
                }),
            )
            .unwrap();
        let ticket = search.begin_search();
        let err = search
            .complete_search(&ticket, Err(ApiError::Transport("offline".into())))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(search.total(), 30);
        assert!(search.last_error().is_some());
        assert!(!search.is_searching());
    }

    #[test]
    fn breed_sort_hidden_for_single_breed() {
        let filters = SearchFilters {
            breeds: vec!["Pug".into()],
            ..SearchFilters::default()
        };
        assert_eq!(
            available_sort_fields(&filters),
            vec![SortField::Name, SortField::Age]
        );
        assert_eq!(available_sort_fields(&SearchFilters::default()).len(), 3);
    }
}
