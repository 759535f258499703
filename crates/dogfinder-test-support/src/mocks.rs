//! In-memory fake of the remote adoption service.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use dogfinder_api_models::{
    Dog, Location, LocationSearchRequest, LocationSearchResponse, LoginRequest, MatchResponse,
    SearchFilters, SearchResponse,
};
use dogfinder_core::api::{ApiError, ApiResult, DogApi};
use dogfinder_core::view::{filter_favorites, sort_dogs};

/// Remote operations, used to script failures and inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /auth/login`.
    Login,
    /// `POST /auth/logout`.
    Logout,
    /// `GET /dogs/breeds`.
    Breeds,
    /// `GET /dogs/search`.
    Search,
    /// `POST /dogs`.
    FetchDogs,
    /// `POST /dogs/match`.
    Match,
    /// `POST /locations`.
    Locations,
    /// `POST /locations/search`.
    SearchLocations,
}

/// Fake service backed by a fixed dog catalog.
///
/// Search filters, sorts and pages the catalog the way the real service
/// does. Failures can be queued per endpoint and every call is recorded.
#[derive(Debug, Default)]
pub struct FakeDogApi {
    catalog: Vec<Dog>,
    locations: Vec<Location>,
    failures: RefCell<HashMap<Endpoint, VecDeque<ApiError>>>,
    calls: RefCell<Vec<Endpoint>>,
    logins: RefCell<Vec<LoginRequest>>,
    match_pick: RefCell<Option<String>>,
}

impl FakeDogApi {
    /// Fake serving `catalog`.
    #[must_use]
    pub fn with_dogs(catalog: Vec<Dog>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Add location records served by the `/locations` endpoints.
    #[must_use]
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Make the next call to `endpoint` fail with `error`.
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.failures
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Force the id returned by the next match call.
    pub fn pick_match(&self, id: &str) {
        *self.match_pick.borrow_mut() = Some(id.to_string());
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().clone()
    }

    /// Number of calls made to `endpoint`.
    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| **call == endpoint)
            .count()
    }

    /// Credentials submitted to login (including refreshes).
    #[must_use]
    pub fn logins(&self) -> Vec<LoginRequest> {
        self.logins.borrow().clone()
    }

    fn enter(&self, endpoint: Endpoint) -> ApiResult<()> {
        self.calls.borrow_mut().push(endpoint);
        let queued = self
            .failures
            .borrow_mut()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        queued.map_or(Ok(()), Err)
    }
}

#[async_trait(?Send)]
impl DogApi for FakeDogApi {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<()> {
        self.enter(Endpoint::Login)?;
        self.logins.borrow_mut().push(credentials.clone());
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.enter(Endpoint::Logout)
    }

    async fn breeds(&self) -> ApiResult<Vec<String>> {
        self.enter(Endpoint::Breeds)?;
        let mut breeds: Vec<String> = self.catalog.iter().map(|dog| dog.breed.clone()).collect();
        breeds.sort();
        breeds.dedup();
        Ok(breeds)
    }

    async fn search_dogs(&self, filters: &SearchFilters) -> ApiResult<SearchResponse> {
        self.enter(Endpoint::Search)?;
        let mut matching = filter_favorites(&self.catalog, filters);
        sort_dogs(&mut matching, filters.sort.field, filters.sort.direction);
        let total = matching.len() as u64;
        let from = filters.from as usize;
        let size = filters.page_size() as usize;
        let result_ids = matching
            .into_iter()
            .skip(from)
            .take(size)
            .map(|dog| dog.id)
            .collect();
        Ok(SearchResponse {
            result_ids,
            total,
            next: None,
            prev: None,
        })
    }

    async fn fetch_dogs(&self, ids: &[String]) -> ApiResult<Vec<Dog>> {
        self.enter(Endpoint::FetchDogs)?;
        Ok(ids
            .iter()
            .filter_map(|id| self.catalog.iter().find(|dog| &dog.id == id).cloned())
            .collect())
    }

    async fn match_dogs(&self, ids: &[String]) -> ApiResult<MatchResponse> {
        self.enter(Endpoint::Match)?;
        let matched = self
            .match_pick
            .borrow_mut()
            .take()
            .or_else(|| ids.first().cloned())
            .ok_or_else(|| ApiError::from_status(400, "no candidates"))?;
        Ok(MatchResponse { matched })
    }

    async fn locations(&self, zip_codes: &[String]) -> ApiResult<Vec<Location>> {
        self.enter(Endpoint::Locations)?;
        Ok(self
            .locations
            .iter()
            .filter(|location| zip_codes.contains(&location.zip_code))
            .cloned()
            .collect())
    }

    async fn search_locations(
        &self,
        request: &LocationSearchRequest,
    ) -> ApiResult<LocationSearchResponse> {
        self.enter(Endpoint::SearchLocations)?;
        let matching: Vec<Location> = self
            .locations
            .iter()
            .filter(|location| {
                request
                    .city
                    .as_ref()
                    .is_none_or(|city| location.city.eq_ignore_ascii_case(city))
            })
            .filter(|location| {
                request
                    .states
                    .as_ref()
                    .is_none_or(|states| states.contains(&location.state))
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let from = request.from.unwrap_or(0) as usize;
        let size = request.size.unwrap_or(25) as usize;
        Ok(LocationSearchResponse {
            results: matching.into_iter().skip(from).take(size).collect(),
            total,
        })
    }
}
