//! Authentication for Data API requests.

pub mod api_key;
mod none;

pub use api_key::ApiKeyAuth;
pub use none::NoAuth;

use crate::error::Result;

/// Trait for authenticating outgoing requests.
///
/// Implementations add credentials to a request before it is sent.
pub trait RequestAuth: Send + Sync {
    /// Attach credentials to `request`.
    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder>;
}
