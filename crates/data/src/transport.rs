//! Transport seam between the Data API operations and the HTTP session.
//!
//! The operations in [`crate::client`] only build [`Request`]s and interpret
//! [`Response`]s; sending them, authentication, timeouts and the mapping of HTTP
//! status codes onto [`DataError`](crate::DataError) kinds belong to a
//! [`Transport`] implementation such as [`crate::http::HttpSession`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// HTTP method of a Data API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A fully-described request, independent of the HTTP library that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl Request {
    /// A `GET` request for an absolute URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A `POST` request with a JSON body.
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Whether the body is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Session collaborator that performs requests against the Data API host.
///
/// Implementations return `Ok` only for successful responses. Failures are
/// reported as one of the vendor error kinds (`BadQuery`, `MissingResource`,
/// ...) carrying the raw response body as the message, or as a transport error.
/// Implementations must be safe to share between concurrent operations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Prefix for every endpoint path. Always ends in `/`.
    fn base_url(&self) -> &str;

    /// Perform one request and wait for its response.
    async fn send(&self, request: Request) -> Result<Response>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builders() {
        let req = Request::post("https://x/quick-search", serde_json::json!({"a": 1}))
            .query("_sort", "acquired asc")
            .query("strict", "true");
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.url(), "https://x/quick-search");
        assert_eq!(req.query_value("_sort"), Some("acquired asc"));
        assert_eq!(req.query_value("name"), None);
        assert_eq!(req.body().unwrap()["a"], 1);

        let req = Request::get("https://x/next");
        assert_eq!(req.method().as_str(), "GET");
        assert!(req.body().is_none());
        assert!(req.query_pairs().is_empty());
    }

    #[test]
    fn empty_response_body() {
        assert!(Response::new(202, "").is_empty());
        assert!(Response::new(202, " \n").is_empty());
        assert!(!Response::new(200, "[]").is_empty());
    }
}
