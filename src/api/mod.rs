//! Typed client for the storefront REST backend.
//!
//! The backend is opaque: this module only knows endpoint paths, request
//! bodies and the fields of the responses the storefront reads. Non-OK
//! responses become [`Error::Api`] carrying the body's `message` when there is
//! one, or an endpoint-specific default otherwise.

pub mod inquiries;
pub mod newsletter;
pub mod payments;
pub mod purchases;
pub mod reviews;

use crate::config::ApiConfig;
use crate::errors::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Status and raw JSON body of a backend response, for callers that need to
/// inspect a non-OK answer instead of failing on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status of the answer
    pub status: StatusCode,
    /// Parsed JSON body; `Null` when empty or not JSON
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body's `message` field, when it is a non-empty string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Converts a non-OK response into [`Error::Api`], using `default_message`
    /// when the body has no message of its own.
    pub fn error_for_status(self, default_message: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(Error::Api {
            status: self.status.as_u16(),
            message: self.message().unwrap_or(default_message).to_string(),
        })
    }

    /// Decodes the body into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.body).map_err(|e| Error::InvalidResponse {
            message: e.to_string(),
        })
    }
}

/// HTTP client bound to one backend base URL. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, &config.base_url))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL with any trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GETs `path` and returns the raw response.
    pub(crate) async fn get_raw(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        debug!("GET {}", path);
        let response = self.http.get(self.url(path)).query(query).send().await?;
        read_response(path, response).await
    }

    /// POSTs `body` as JSON to `path` and returns the raw response.
    pub(crate) async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        debug!("POST {}", path);
        let response = self.http.post(self.url(path)).json(body).send().await?;
        read_response(path, response).await
    }

    /// GETs `path`, failing with `default_message` on a non-OK status.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        default_message: &str,
    ) -> Result<T> {
        self.get_raw(path, query)
            .await?
            .error_for_status(default_message)?
            .decode()
    }

    /// POSTs `body` to `path`, failing with `default_message` on a non-OK status.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B, default_message: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_raw(path, body)
            .await?
            .error_for_status(default_message)?
            .decode()
    }
}

// Empty or non-JSON bodies are kept as `Null`; only endpoints that decode a
// typed body care about them.
async fn read_response(path: &str, response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Non-JSON body from {} (status {}): {}", path, status, e);
            Value::Null
        })
    };
    if !status.is_success() {
        warn!("{} returned status {}", path, status);
    }
    Ok(ApiResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{api_client_for, init_test_tracing};
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_client(Client::new(), "http://localhost:3001/api/");
        assert_eq!(client.url("/reviews"), "http://localhost:3001/api/reviews");
    }

    #[tokio::test]
    async fn test_non_ok_uses_body_message() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/quotes");
            then.status(422).json_body(json!({ "message": "Budget is invalid" }));
        });

        let client = api_client_for(&server);
        let result: Result<Value> = client.post_json("/quotes", &json!({}), "Failed").await;
        match result {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "Budget is invalid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_non_ok_without_json_uses_default_message() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/testimonials");
            then.status(502).body("<html>Bad gateway</html>");
        });

        let client = api_client_for(&server);
        let result: Result<Value> = client
            .get_json("/testimonials", &[], "Failed to fetch testimonials")
            .await;
        assert!(matches!(
            result,
            Err(Error::Api { status: 502, ref message }) if message == "Failed to fetch testimonials"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_invalid_response() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/reviews/featured");
            then.status(200).json_body(json!({ "unexpected": true }));
        });

        let client = api_client_for(&server);
        let result: Result<Vec<crate::entities::Review>> =
            client.get_json("/reviews/featured", &[], "Failed").await;
        assert!(matches!(result, Err(Error::InvalidResponse { .. })));
        Ok(())
    }
}
