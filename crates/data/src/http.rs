//! reqwest-backed session for the Data API host.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::auth::{ApiKeyAuth, NoAuth, RequestAuth};
use crate::error::{DataError, Result};
use crate::transport::{Method, Request, Response, Transport};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.planet.com/";

/// Environment variable overriding the API host.
pub const BASE_URL_ENV: &str = "PL_API_BASE_URL";

/// Configuration for [`HttpSession`].
#[derive(Clone)]
pub struct SessionOptions {
    /// API host every endpoint path is appended to (default
    /// `https://api.planet.com/`).
    pub base_url: String,
    /// API key sent as basic auth. `None` sends no credentials.
    pub api_key: Option<String>,
    /// Per-request timeout (default 30 s).
    pub request_timeout: Duration,
}

impl SessionOptions {
    /// Options from `PL_API_KEY` (required) and `PL_API_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let auth = ApiKeyAuth::from_env()?;
        let mut options = Self {
            api_key: Some(auth.key().to_string()),
            ..Self::default()
        };
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            options.base_url = url;
        }
        Ok(options)
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// HTTP session: connection pool, credentials and error taxonomy.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct HttpSession {
    client: Client,
    base_url: String,
    auth: Arc<dyn RequestAuth>,
}

impl HttpSession {
    /// Create a session authenticating with `options.api_key`, if any.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let auth: Arc<dyn RequestAuth> = match options.api_key {
            Some(ref key) => Arc::new(ApiKeyAuth::new(key.as_str())?),
            None => Arc::new(NoAuth),
        };
        Self::with_auth(options, auth)
    }

    /// Create a session with a custom authenticator; `options.api_key` is
    /// ignored.
    pub fn with_auth(options: SessionOptions, auth: Arc<dyn RequestAuth>) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&options.base_url),
            auth,
        })
    }

    /// Create a session with API key auth from `PL_API_KEY`, against
    /// `PL_API_BASE_URL` if set.
    pub fn from_env() -> Result<Self> {
        Self::new(SessionOptions::from_env()?)
    }

    /// Create an unauthenticated session against `base_url`.
    pub fn unauthenticated(base_url: &str) -> Result<Self> {
        Self::new(SessionOptions {
            base_url: base_url.to_string(),
            ..SessionOptions::default()
        })
    }

    fn build(&self, request: &Request) -> Result<reqwest::RequestBuilder> {
        let mut builder = match request.method() {
            Method::Get => self.client.get(request.url()),
            Method::Post => self.client.post(request.url()),
        };
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        self.auth.authorize(builder)
    }
}

#[async_trait]
impl Transport for HttpSession {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: Request) -> Result<Response> {
        debug!(method = request.method().as_str(), url = request.url(), "sending request");
        let resp = self.build(&request)?.send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if status.is_success() {
            return Ok(Response::new(status.as_u16(), body.to_vec()));
        }
        Err(status_error(status, String::from_utf8_lossy(&body).into_owned()))
    }
}

/// Map a non-success status onto the vendor error taxonomy. The raw body
/// becomes the message.
pub fn status_error(status: StatusCode, body: String) -> DataError {
    match status.as_u16() {
        400 => DataError::BadQuery(body),
        401 => DataError::InvalidApiKey(body),
        403 => DataError::NoPermission(body),
        404 => DataError::MissingResource(body),
        429 if body.to_lowercase().contains("exceeded quota") => DataError::OverQuota(body),
        429 => DataError::TooManyRequests(body),
        500..=599 => DataError::ServerError(body),
        code => DataError::Api {
            status: code,
            message: body,
        },
    }
}

fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
