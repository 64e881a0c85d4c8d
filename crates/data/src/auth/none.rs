//! No-op authentication, for local test servers and proxies that add their own.

use crate::auth::RequestAuth;
use crate::error::Result;

/// No authentication.
pub struct NoAuth;

impl RequestAuth for NoAuth {
    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(request)
    }
}
