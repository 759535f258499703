//! HTTP client for the adoption service.
//!
//! Every request sends credentials so the browser attaches the HTTP-only
//! auth cookie set by `POST /auth/login`.

use async_trait::async_trait;
use dogfinder_api_models::{
    Dog, Location, LocationSearchRequest, LocationSearchResponse, LoginRequest, MatchResponse,
    SearchFilters, SearchResponse,
};
use dogfinder_core::api::{ApiError, ApiResult, DogApi};
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::RequestCredentials;

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(request: Request) -> ApiResult<Response> {
        let response = request
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        if response.ok() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                response.status_text()
            } else {
                body.trim().to_string()
            };
            Err(ApiError::from_status(status, message))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = Request::post(&self.url(path))
            .json(body)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Self::decode(Self::send(request).await?).await
    }
}

/// `path?key=value&...` with every value percent-encoded.
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    format!("{path}?{}", query.join("&"))
}

#[async_trait(?Send)]
impl DogApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<()> {
        let request = Request::post(&self.url("/auth/login"))
            .json(credentials)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Self::send(request).await?;
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        Self::send(Request::post(&self.url("/auth/logout"))).await?;
        Ok(())
    }

    async fn breeds(&self) -> ApiResult<Vec<String>> {
        let response = Self::send(Request::get(&self.url("/dogs/breeds"))).await?;
        Self::decode(response).await
    }

    async fn search_dogs(&self, filters: &SearchFilters) -> ApiResult<SearchResponse> {
        let path = with_query("/dogs/search", &filters.query_pairs());
        let response = Self::send(Request::get(&self.url(&path))).await?;
        Self::decode(response).await
    }

    async fn fetch_dogs(&self, ids: &[String]) -> ApiResult<Vec<Dog>> {
        self.post_json("/dogs", ids).await
    }

    async fn match_dogs(&self, ids: &[String]) -> ApiResult<MatchResponse> {
        self.post_json("/dogs/match", ids).await
    }

    async fn locations(&self, zip_codes: &[String]) -> ApiResult<Vec<Location>> {
        self.post_json("/locations", zip_codes).await
    }

    async fn search_locations(
        &self,
        request: &LocationSearchRequest,
    ) -> ApiResult<LocationSearchResponse> {
        self.post_json("/locations/search", request).await
    }
}
