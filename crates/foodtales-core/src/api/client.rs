//! API client for communicating with the FoodTales REST backend.
//!
//! This module provides the `ApiClient` struct: request building, bearer
//! authorization, response checking and rate-limit retries. The per-resource
//! operations live in sibling modules as further `impl ApiClient` blocks.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::config::Config;

use super::error::{ApiError, ApiResult};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) GET requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Query string for requests without parameters.
const NO_QUERY: [(&str, &str); 0] = [];

/// Where a request's bearer token comes from.
#[derive(Clone)]
enum TokenSource {
    None,
    Fixed(String),
    Session(SessionStore),
}

/// API client for the FoodTales backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: TokenSource,
    clear_session_on_unauthorized: bool,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a new, unauthenticated API client
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
            token: TokenSource::None,
            clear_session_on_unauthorized: config.clear_session_on_unauthorized,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: TokenSource::Fixed(token.into()),
            ..self.clone()
        }
    }

    /// Create a new ApiClient that reads its token from `session` on every
    /// request. A 401 from the backend signs the session out unless the
    /// configuration disables it.
    pub fn with_session(&self, session: SessionStore) -> Self {
        Self {
            token: TokenSource::Session(session),
            ..self.clone()
        }
    }

    /// Override the first rate-limit backoff delay.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn session(&self) -> Option<&SessionStore> {
        match &self.token {
            TokenSource::Session(session) => Some(session),
            _ => None,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn current_token(&self) -> Option<String> {
        match &self.token {
            TokenSource::None => None,
            TokenSource::Fixed(token) => Some(token.clone()),
            TokenSource::Session(session) => session.token(),
        }
    }

    fn auth_headers(&self) -> ApiResult<header::HeaderMap> {
        let token = self.current_token().ok_or(ApiError::MissingToken)?;
        let mut headers = header::HeaderMap::new();
        let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::Unauthorized("Token contains invalid header characters".to_string()))?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Start a request that requires a bearer token.
    pub(crate) fn authed(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path))
            .headers(self.auth_headers()?))
    }

    /// Start a request that is sent without credentials.
    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send `request`, returning the response and the bearer token it carried.
    async fn dispatch(&self, request: RequestBuilder) -> ApiResult<(reqwest::Response, Option<String>)> {
        let request = request.build()?;
        let sent_token = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        let response = self.client.execute(request).await?;
        Ok((response, sent_token))
    }

    /// Check if response is successful, returning an error with body if not.
    ///
    /// A 401 signs the session out only if it still holds `sent_token`; a
    /// late answer to a request made with a replaced token is ignored.
    async fn check_response(
        &self,
        response: reqwest::Response,
        sent_token: Option<&str>,
    ) -> ApiResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        debug!(url = %url, status = status.as_u16(), error = %err, "Request failed");

        if err.is_unauthorized() && self.clear_session_on_unauthorized {
            if let (Some(session), Some(sent)) = (self.session(), sent_token) {
                if session.token().as_deref() == Some(sent) {
                    info!(url = %url, "Backend rejected the session token; signing out");
                    session.sign_out();
                } else {
                    debug!(url = %url, "401 for a token no longer in use; keeping session");
                }
            }
        }
        Err(err)
    }

    /// Send `request` and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let (response, sent_token) = self.dispatch(request).await?;
        let response = self.check_response(response, sent_token.as_deref()).await?;
        let url = response.url().path().to_string();
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e)))
    }

    /// Send `request`, ignoring any success body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        let (response, sent_token) = self.dispatch(request).await?;
        self.check_response(response, sent_token.as_deref()).await?;
        Ok(())
    }

    /// Authenticated GET with retries on HTTP 429.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_with_query(path, &NO_QUERY).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let (response, sent_token) = self.dispatch(self.authed(Method::GET, path)?.query(query)).await?;

            if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
                let response = self.check_response(response, sent_token.as_deref()).await?;
                let text = response.text().await?;
                return serde_json::from_str(&text).map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
                });
            }

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                return Err(ApiError::RateLimited);
            }
            warn!(path = path, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
            tokio::time::sleep(backoff).await;
            backoff *= 2; // Exponential backoff
        }
    }

    /// Authenticated request with a JSON body and a JSON response.
    pub(crate) async fn send_with_body<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.authed(method, path)?.json(body);
        self.send_json(request).await
    }

    /// Authenticated DELETE.
    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.authed(Method::DELETE, path)?;
        self.send_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    fn client() -> ApiClient {
        let config = Config {
            base_url: "http://localhost:8080/".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(client().url("/posts"), "http://localhost:8080/posts");
    }

    #[test]
    fn test_missing_token_is_reported() {
        assert!(matches!(client().auth_headers(), Err(ApiError::MissingToken)));
    }

    #[test]
    fn test_fixed_token_header() {
        let headers = client().with_token("abc123").auth_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");
    }

    #[tokio::test]
    async fn test_session_token_is_read_per_request() {
        let session = SessionStore::open(MemoryStore::new()).unwrap();
        session.wait_until_loaded().await;
        let api = client().with_session(session.clone());

        assert!(matches!(api.auth_headers(), Err(ApiError::MissingToken)));
        session.set_token(Some("fresh".to_string()));
        let headers = api.auth_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer fresh");
    }
}
