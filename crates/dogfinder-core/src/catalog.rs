//! Search results, favorites and the active mode, kept consistent together.
//!
//! Operations that need a remote search return the [`SearchTicket`] to run;
//! favorites mode never searches remotely, so those operations return `None`
//! there and instead re-settle the local page.

use dogfinder_api_models::{Dog, SortField};

use crate::api::{ApiError, ApiResult, DogApi};
use crate::favorites::FavoritesStore;
use crate::search::{FilterChange, SearchController, SearchOutcome, SearchTicket, fetch_results};
use crate::storage::StorageHandle;
use crate::view::{self, PageView, ViewMode};

/// Search + favorites + mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    search: SearchController,
    favorites: FavoritesStore,
    mode: ViewMode,
}

impl Catalog {
    /// Restore filters from the durable store and favorites from the session store.
    #[must_use]
    pub fn restore(local: StorageHandle, session: StorageHandle) -> Self {
        Self {
            search: SearchController::restore(local),
            favorites: FavoritesStore::restore(session),
            mode: ViewMode::Search,
        }
    }

    /// Resume `mode` as left by an earlier run, keeping the stored filters.
    #[must_use]
    pub fn resumed(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self.settle();
        self
    }

    /// Search controller.
    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    /// Favorites store.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Active mode.
    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The page to render.
    #[must_use]
    pub fn page(&self) -> PageView {
        view::compose_page(
            self.mode,
            self.search.results(),
            self.search.total(),
            self.favorites.favorites(),
            self.search.filters(),
        )
    }

    /// Breed choices for the active mode.
    #[must_use]
    pub fn breed_options(&self, remote_breeds: &[String]) -> Vec<String> {
        view::breed_options(self.mode, remote_breeds, self.favorites.favorites())
    }

    /// Search to issue on first render.
    pub fn initial_search(&mut self) -> Option<SearchTicket> {
        self.search_if_remote()
    }

    /// Switch mode, adjusting filters for the new source.
    #[must_use]
    pub fn set_mode(&mut self, mode: ViewMode) -> Option<SearchTicket> {
        if !self.enter_mode(mode) {
            return None;
        }
        self.search_if_remote()
    }

    /// Switch mode and adjust filters without issuing a search.
    /// Returns whether the mode changed.
    pub fn enter_mode(&mut self, mode: ViewMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        let filters = self.search.filters();
        let next = match mode {
            ViewMode::Favorites => view::enter_favorites_filters(filters, self.favorites.favorites()),
            ViewMode::Search => {
                let mut next = filters.clone();
                next.from = 0;
                next
            }
        };
        self.search.set_filters(next);
        true
    }

    /// Flip between search and favorites mode.
    #[must_use]
    pub fn toggle_mode(&mut self) -> Option<SearchTicket> {
        self.set_mode(self.mode.toggled())
    }

    /// Apply a filter change.
    pub fn apply(&mut self, change: FilterChange) -> Option<SearchTicket> {
        if !self.search.apply(change) {
            return None;
        }
        self.after_filters_changed()
    }

    /// Flip the sort direction.
    pub fn toggle_sort(&mut self) -> Option<SearchTicket> {
        self.apply(FilterChange::Sort(self.search.filters().sort.toggled()))
    }

    /// Change the sort field.
    pub fn set_sort_field(&mut self, field: SortField) -> Option<SearchTicket> {
        self.apply(FilterChange::Sort(
            self.search.filters().sort.with_field(field),
        ))
    }

    /// Filter by one zip code; blank clears.
    pub fn set_zip_code(&mut self, zip: Option<&str>) -> Option<SearchTicket> {
        self.apply(FilterChange::ZipCodes(crate::search::zip_filter(zip)))
    }

    /// Reset every filter.
    pub fn clear_filters(&mut self) -> Option<SearchTicket> {
        self.apply(FilterChange::Clear)
    }

    /// Next page, when one exists.
    pub fn next_page(&mut self) -> Option<SearchTicket> {
        if !self.page().has_next {
            return None;
        }
        if !self.search.next_page() {
            return None;
        }
        self.search_if_remote()
    }

    /// Previous page, clamped at the first.
    pub fn prev_page(&mut self) -> Option<SearchTicket> {
        if !self.search.prev_page() {
            return None;
        }
        self.search_if_remote()
    }

    /// Toggle `dog` in favorites. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, dog: Dog) -> bool {
        let added = self.favorites.toggle(dog);
        self.settle();
        added
    }

    /// Upsert `dog` into favorites.
    pub fn add_favorite(&mut self, dog: Dog) {
        self.favorites.add(dog);
        self.settle();
    }

    /// Remove `id` from favorites. Returns whether it was present.
    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let removed = self.favorites.remove(id);
        self.settle();
        removed
    }

    /// Step back from an empty favorites page. Returns whether the offset moved.
    pub fn settle(&mut self) -> bool {
        if self.mode != ViewMode::Favorites {
            return false;
        }
        match view::corrected_offset(self.favorites.favorites(), self.search.filters()) {
            Some(from) => self.search.apply(FilterChange::From(from)),
            None => false,
        }
    }

    /// Record a search completion.
    ///
    /// # Errors
    ///
    /// See [`SearchController::complete_search`].
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: ApiResult<SearchOutcome>,
    ) -> Result<bool, ApiError> {
        self.search.complete_search(ticket, result)
    }

    /// Run `ticket` against `api` and record the outcome.
    ///
    /// # Errors
    ///
    /// See [`SearchController::complete_search`].
    pub async fn run(&mut self, api: &dyn DogApi, ticket: &SearchTicket) -> Result<bool, ApiError> {
        let result = fetch_results(api, &ticket.filters).await;
        self.complete_search(ticket, result)
    }

    fn after_filters_changed(&mut self) -> Option<SearchTicket> {
        match self.mode {
            ViewMode::Search => Some(self.search.begin_search()),
            ViewMode::Favorites => {
                self.settle();
                None
            }
        }
    }

    fn search_if_remote(&mut self) -> Option<SearchTicket> {
        match self.mode {
            ViewMode::Search => Some(self.search.begin_search()),
            ViewMode::Favorites => None,
        }
    }
}
