//! API key authentication.
//!
//! The Data API accepts the account's API key as the user name of HTTP basic
//! auth, with an empty password. The key is read from `PL_API_KEY` by
//! [`ApiKeyAuth::from_env`].

use std::fmt;

use crate::auth::RequestAuth;
use crate::error::{DataError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "PL_API_KEY";

/// HTTP basic auth with an API key.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key: String,
}

impl ApiKeyAuth {
    /// Use an explicit key. An empty key is rejected.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DataError::Auth("API key is empty".into()));
        }
        Ok(Self { key })
    }

    /// Load the key from `PL_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| DataError::Auth(format!("{API_KEY_ENV} not set")))?;
        Self::new(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

// Keep the key out of logs.
impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth").field("key", &"<redacted>").finish()
    }
}

impl RequestAuth for ApiKeyAuth {
    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(request.basic_auth(&self.key, Some("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(ApiKeyAuth::new(""), Err(DataError::Auth(_))));
        assert!(matches!(ApiKeyAuth::new("  "), Err(DataError::Auth(_))));
    }

    #[test]
    fn debug_hides_the_key() {
        let auth = ApiKeyAuth::new("PLAKsecret").unwrap();
        assert_eq!(auth.key(), "PLAKsecret");
        assert!(!format!("{auth:?}").contains("PLAKsecret"));
    }
}
