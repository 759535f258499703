//! Remote service port and its error taxonomy.

use async_trait::async_trait;
use dogfinder_api_models::{
    Dog, Location, LocationSearchRequest, LocationSearchResponse, LoginRequest, MatchResponse,
    SearchFilters, SearchResponse,
};
use thiserror::Error;

/// Errors surfaced by a [`DogApi`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service rejected the session cookie (HTTP 401/403).
    #[error("session credentials were rejected")]
    Unauthorized,
    /// No stored name/email to re-authenticate with.
    #[error("no stored credentials available to refresh the session")]
    MissingCredentials,
    /// Any other non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// Network failure before a response arrived.
    #[error("network error: {0}")]
    Transport(String),
    /// Response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map an HTTP status to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            _ => Self::Status {
                status,
                message: message.into(),
            },
        }
    }

    /// Whether the failure means the user must log in again.
    #[must_use]
    pub const fn is_credentials_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MissingCredentials)
    }
}

/// Result alias for remote calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Operations offered by the remote adoption service.
///
/// Futures are not `Send`; the browser client runs on a single-threaded
/// executor.
#[async_trait(?Send)]
pub trait DogApi {
    /// `POST /auth/login`; establishes the session cookie.
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<()>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> ApiResult<()>;

    /// Obtain a fresh session token.
    ///
    /// The service has no refresh endpoint, so the default re-submits the
    /// login credentials.
    async fn refresh_session(&self, credentials: &LoginRequest) -> ApiResult<()> {
        self.login(credentials).await
    }

    /// `GET /dogs/breeds`.
    async fn breeds(&self) -> ApiResult<Vec<String>>;

    /// `GET /dogs/search` with the filter query.
    async fn search_dogs(&self, filters: &SearchFilters) -> ApiResult<SearchResponse>;

    /// `POST /dogs`; hydrate ids into records.
    async fn fetch_dogs(&self, ids: &[String]) -> ApiResult<Vec<Dog>>;

    /// `POST /dogs/match`; pick one id from the candidates.
    async fn match_dogs(&self, ids: &[String]) -> ApiResult<MatchResponse>;

    /// `POST /locations`; look up zip codes.
    async fn locations(&self, zip_codes: &[String]) -> ApiResult<Vec<Location>>;

    /// `POST /locations/search`.
    async fn search_locations(
        &self,
        request: &LocationSearchRequest,
    ) -> ApiResult<LocationSearchResponse>;
}
