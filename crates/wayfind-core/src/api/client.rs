//! reqwest-backed `RemoteSource` for the wayfind REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use super::remote::{Method, RemoteRequest, RemoteResponse, RemoteSource};
use super::ApiResult;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP remote for the wayfind API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemote {
    /// Create a new remote rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token forwarded on every request
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new remote with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn send(&self, request: RemoteRequest) -> ApiResult<RemoteResponse> {
        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .header(header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        debug!(url = %url, status, bytes = body.len(), "Response received");
        Ok(RemoteResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let remote = HttpRemote::new("https://api.example.com/v1/", Duration::from_secs(5))
            .expect("client should build");
        assert_eq!(remote.base_url(), "https://api.example.com/v1");
        assert_eq!(remote.url("/trails/7"), "https://api.example.com/v1/trails/7");
    }

    #[test]
    fn test_with_token_keeps_base_url() {
        let remote = HttpRemote::new("https://api.example.com", Duration::from_secs(5))
            .expect("client should build");
        let authed = remote.with_token("abc".to_string());
        assert_eq!(authed.base_url(), remote.base_url());
        assert_eq!(authed.token.as_deref(), Some("abc"));
        assert!(remote.token.is_none());
    }
}
