//! The HTTP-shaped contract every data facade talks to.
//!
//! A `RemoteSource` turns a `RemoteRequest` into a `RemoteResponse`. It does
//! not interpret status codes: a 304 or a 404 comes back as a response and
//! the caller decides what it means.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::{ApiError, ApiResult};

/// Header carrying the revalidation token on responses.
pub const ETAG: &str = "etag";

/// Header carrying the revalidation token on conditional requests.
pub const IF_NONE_MATCH: &str = "if-none-match";

/// `base/<id>/<suffix...>`, with `id` escaped as exactly one path segment.
pub fn resource_path(base: &str, id: &str, suffix: &[&str]) -> ApiResult<String> {
    if id.trim().is_empty() || id == "." || id == ".." {
        return Err(ApiError::InvalidId(id.to_string()));
    }
    let invalid = || ApiError::InvalidId(id.to_string());

    let mut url = Url::parse("http://localhost/").map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(id)
        .extend(suffix);
    Ok(format!("{}{}", base.trim_end_matches('/'), url.path()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
    Head,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    /// Path relative to the remote's base URL, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RemoteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::Head, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::decode("request body", e))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteResponse {
    pub status: u16,
    /// Header names are stored lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RemoteResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn etag(&self) -> Option<&str> {
        self.header(ETAG).filter(|tag| !tag.is_empty())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Pass successful responses through, map everything else to an error.
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(&self, what: &str) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::decode(what, e))
    }
}

/// A remote data source speaking an HTTP-shaped request/response protocol.
///
/// Connection pooling, auth headers and deadlines belong to the implementor.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> ApiResult<RemoteResponse>;
}

#[async_trait]
impl<R: RemoteSource + ?Sized> RemoteSource for std::sync::Arc<R> {
    async fn send(&self, request: RemoteRequest) -> ApiResult<RemoteResponse> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<R: RemoteSource + ?Sized> RemoteSource for &R {
    async fn send(&self, request: RemoteRequest) -> ApiResult<RemoteResponse> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = RemoteRequest::get("/trails/search")
            .query("q", "falls")
            .query_opt::<u32>("limit", None)
            .query_opt("cursor", Some("abc"))
            .header("If-None-Match", "\"v1\"");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.query_value("q"), Some("falls"));
        assert_eq!(req.query_value("limit"), None);
        assert_eq!(req.query_value("cursor"), Some("abc"));
        assert_eq!(req.header_value(IF_NONE_MATCH), Some("\"v1\""));
    }

    #[test]
    fn test_resource_path_escapes_id() {
        assert_eq!(resource_path("/wishlist", "p-1", &[]).unwrap(), "/wishlist/p-1");
        assert_eq!(resource_path("/wishlist", "#frag", &[]).unwrap(), "/wishlist/%23frag");
        assert_eq!(resource_path("/wishlist", "a?b=1", &[]).unwrap(), "/wishlist/a%3Fb=1");
        assert_eq!(
            resource_path("/wishlist", "x/../../trails/7", &[]).unwrap(),
            "/wishlist/x%2F..%2F..%2Ftrails%2F7"
        );
        assert_eq!(
            resource_path("/trails", "a b", &["geometry"]).unwrap(),
            "/trails/a%20b/geometry"
        );
    }

    #[test]
    fn test_resource_path_rejects_dot_segments() {
        for id in ["", " ", ".", ".."] {
            assert!(matches!(
                resource_path("/wishlist", id, &[]),
                Err(ApiError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn test_response_headers_case_insensitive() {
        let resp = RemoteResponse::new(200, "[]").with_header("ETag", "\"T1\"");
        assert_eq!(resp.etag(), Some("\"T1\""));
        assert_eq!(resp.header("etag"), Some("\"T1\""));
        assert!(resp.is_success());
    }

    #[test]
    fn test_error_for_status() {
        assert!(RemoteResponse::new(204, "").error_for_status().is_ok());
        let err = RemoteResponse::new(404, "missing").error_for_status().unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_json_decode_error() {
        let resp = RemoteResponse::new(200, "{not json");
        let err = resp.json::<Vec<String>>("names").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(err.to_string().contains("names"));
    }
}
