//! Error type and the reqwest-backed adapter for the remote service.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use dogfinder_api_models::{
    Dog, Location, LocationSearchRequest, LocationSearchResponse, LoginRequest, MatchResponse,
    SearchFilters, SearchResponse,
};
use dogfinder_core::api::{ApiError, ApiResult, DogApi};
use dogfinder_core::matching::MatchError;
use dogfinder_core::session::SessionError;
use dogfinder_core::storage::StorageHandle;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::state::AUTH_COOKIE_KEY;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status {
                status: 400 | 422,
                message,
            } => Self::validation(message),
            ApiError::Unauthorized | ApiError::MissingCredentials => Self::failure(anyhow!(
                "{error}; log in again with `dogfinder login --name <name> --email <email>`"
            )),
            other => Self::failure(other),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::MissingFields => Self::validation(error.to_string()),
            SessionError::Api(api) => api.into(),
        }
    }
}

impl From<MatchError> for CliError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::NoFavorites => Self::validation(error.to_string()),
            other => Self::failure(other),
        }
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Build the shared HTTP client tagged with the invocation's trace id.
pub(crate) fn build_http_client(timeout: Duration, trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(timeout)
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// [`DogApi`] over HTTP.
///
/// The service authenticates with an HTTP-only cookie. The cookie pair set
/// by login is kept in the session scope and replayed on every request, so
/// separate invocations share one remote session.
#[derive(Clone)]
pub(crate) struct HttpDogApi {
    client: Client,
    base_url: Url,
    session: StorageHandle,
}

impl HttpDogApi {
    pub(crate) const fn new(client: Client, base_url: Url, session: StorageHandle) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Transport(format!("invalid base URL: {err}")))
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> ApiResult<Response> {
        let builder = match self.session.read(AUTH_COOKIE_KEY) {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        };
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(format!("request to {path} failed: {err}")))?;
        tracing::debug!(path, status = %response.status(), "service responded");
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_status(response).await)
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self.send(path, self.client.post(url).json(body)).await?;
        decode(response).await
    }

    fn remember_cookie(&self, response: &Response) {
        let pairs: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| raw.split(';').next())
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect();
        if !pairs.is_empty() {
            self.session.persist_raw(AUTH_COOKIE_KEY, &pairs.join("; "));
        }
    }
}

#[async_trait(?Send)]
impl DogApi for HttpDogApi {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<()> {
        let url = self.endpoint("/auth/login")?;
        let response = self
            .send("/auth/login", self.client.post(url).json(credentials))
            .await?;
        self.remember_cookie(&response);
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint("/auth/logout")?;
        self.send("/auth/logout", self.client.post(url)).await?;
        Ok(())
    }

    async fn breeds(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint("/dogs/breeds")?;
        let response = self.send("/dogs/breeds", self.client.get(url)).await?;
        decode(response).await
    }

    async fn search_dogs(&self, filters: &SearchFilters) -> ApiResult<SearchResponse> {
        let url = self.endpoint("/dogs/search")?;
        let pairs = filters.query_pairs();
        let response = self
            .send("/dogs/search", self.client.get(url).query(&pairs))
            .await?;
        decode(response).await
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

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// Classify a non-success HTTP response.
pub(crate) async fn classify_status(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("status {status}"), str::to_string)
    } else {
        body.trim().to_string()
    };
    ApiError::from_status(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dogfinder_api_models::{SortDirection, SortField, SortSpec};
    use httpmock::prelude::*;
    use serde_json::json;

    fn api_for(server: &MockServer) -> Result<(HttpDogApi, StorageHandle)> {
        let session = StorageHandle::memory();
        let base_url = server
            .base_url()
            .parse()
            .map_err(|_| anyhow!("valid URL"))?;
        let client = build_http_client(Duration::from_secs(5), "trace-123")
            .map_err(|err| anyhow!(err.display_message()))?;
        Ok((HttpDogApi::new(client, base_url, session.clone()), session))
    }

    #[tokio::test]
    async fn login_cookie_is_replayed_on_later_calls() -> Result<()> {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .header(HEADER_REQUEST_ID, "trace-123")
                .json_body(json!({"name": "Ada", "email": "ada@example.com"}));
            then.status(200)
                .header("set-cookie", "fetch-access-token=abc123; HttpOnly; Secure")
                .body("OK");
        });
        let breeds = server.mock(|when, then| {
            when.method(GET)
                .path("/dogs/breeds")
                .header("cookie", "fetch-access-token=abc123");
            then.status(200).json_body(json!(["Beagle", "Pug"]));
        });

        let (api, session) = api_for(&server)?;
        api.login(&LoginRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        })
        .await?;
        assert_eq!(
            session.read(AUTH_COOKIE_KEY).as_deref(),
            Some("fetch-access-token=abc123")
        );
        assert_eq!(api.breeds().await?, vec!["Beagle", "Pug"]);

        login.assert();
        breeds.assert();
        Ok(())
    }

    #[tokio::test]
    async fn search_encodes_filters_as_query_pairs() -> Result<()> {
        let server = MockServer::start_async().await;
        let search = server.mock(|when, then| {
            when.method(GET)
                .path("/dogs/search")
                .query_param("breeds", "Pug")
                .query_param("breeds", "Beagle")
                .query_param("ageMin", "2")
                .query_param("size", "12")
                .query_param("from", "24")
                .query_param("sort", "name:desc");
            then.status(200)
                .json_body(json!({"resultIds": ["a", "b"], "total": 40}));
        });

        let (api, _) = api_for(&server)?;
        let filters = SearchFilters {
            breeds: vec!["Pug".into(), "Beagle".into()],
            age_min: Some(2),
            from: 24,
            sort: SortSpec::new(SortField::Name, SortDirection::Desc),
            ..SearchFilters::default()
        };
        let response = api.search_dogs(&filters).await?;
        assert_eq!(response.result_ids, vec!["a", "b"]);
        assert_eq!(response.total, 40);
        search.assert();
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_unauthorized() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/dogs");
            then.status(401).body("Unauthorized");
        });
        server.mock(|when, then| {
            when.method(POST).path("/dogs/match");
            then.status(500);
        });

        let (api, _) = api_for(&server)?;
        let err = api.fetch_dogs(&["a".to_string()]).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);

        let err = api.match_dogs(&["a".to_string()]).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "Internal Server Error".into()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/locations");
            then.status(200).body("<html>");
        });
        let (api, _) = api_for(&server)?;
        let err = api.locations(&["10001".to_string()]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        Ok(())
    }

    #[test]
    fn errors_map_to_exit_codes() {
        assert_eq!(CliError::from(SessionError::MissingFields).exit_code(), 2);
        assert_eq!(CliError::from(MatchError::NoFavorites).exit_code(), 2);
        assert_eq!(
            CliError::from(ApiError::Status {
                status: 400,
                message: "bad sort".into()
            })
            .display_message(),
            "bad sort"
        );
        let unauthorized = CliError::from(ApiError::Unauthorized);
        assert_eq!(unauthorized.exit_code(), 3);
        assert!(unauthorized.display_message().contains("dogfinder login"));
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
