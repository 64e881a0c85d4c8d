//! Error types for the Data API client.

use thiserror::Error;

/// Errors produced by the Data API client.
///
/// The first block mirrors the vendor's HTTP error taxonomy. Messages start out
/// as the raw response body; the Data API operations narrow `BadQuery` and
/// `MissingResource` to a single human-readable message.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("bad query: {0}")]
    BadQuery(String),

    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("no permission: {0}")]
    NoPermission(String),

    #[error("missing resource: {0}")]
    MissingResource(String),

    #[error("too many requests: {0}")]
    TooManyRequests(String),

    #[error("over quota: {0}")]
    OverQuota(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("unexpected HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server's error body did not have the documented shape.
    #[error("malformed error body (expected {expected}): {body}")]
    MalformedErrorBody { expected: &'static str, body: String },

    #[error("invalid sort order {0:?} (expected one of: acquired asc, acquired desc, published asc, published desc)")]
    InvalidSort(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Result alias for Data API operations.
pub type Result<T> = std::result::Result<T, DataError>;
