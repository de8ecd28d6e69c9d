use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use regcollect_common::{RegcollectError, Result};

/// HTTP client for the collection backend.
///
/// Cloning is cheap; the underlying connection pool is shared. A client made
/// with [`ApiClient::with_token`] sends `Authorization: Bearer <token>` on
/// every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:51922/api/v1";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| RegcollectError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// A copy of this client that authenticates as the holder of `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn any non-2xx status into `RegcollectError::Api`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "backend rejected request");
        Err(RegcollectError::from_response(status.as_u16(), status.canonical_reason(), &body))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        Ok(resp.json().await?)
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self.send(self.request(Method::GET, path).query(query)).await?;
        Ok(resp.json().await?)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(method, path).json(body)).await?;
        Ok(resp.json().await?)
    }

    /// For endpoints that answer with 204 or a body nobody reads.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        self.send(self.request(method, path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://backend:8000/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://backend:8000/api/v1");
        assert_eq!(client.url("/institutions/"), "http://backend:8000/api/v1/institutions/");
    }

    #[test]
    fn test_with_token_keeps_base_and_sets_token() {
        let client = ApiClient::new(ApiClient::DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap();
        assert!(client.token().is_none());
        let authed = client.with_token("abc");
        assert_eq!(authed.token(), Some("abc"));
        assert_eq!(authed.base_url(), client.base_url());
    }
}
