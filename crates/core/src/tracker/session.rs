//! Authenticated access to the tracker.
//!
//! SKTorrent keeps a logged-in session in two cookies (`uid`, `pass`).
//! [`HttpSession`] attaches them to every request; everything else talks
//! to the tracker through the [`TrackerSession`] trait so tests can swap
//! in scripted responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::TrackerConfig;

/// Errors from a single tracker round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Tracker returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// A pre-authenticated channel to the tracker.
#[async_trait]
pub trait TrackerSession: Send + Sync {
    /// Fetch a page as text.
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;

    /// Fetch a resource as raw bytes.
    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed session carrying the tracker's cookies.
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    /// Create a session from tracker configuration.
    pub fn new(config: &TrackerConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, header_value(&cookie_header(config))?);
        headers.insert(REFERER, header_value(&config.base_url)?);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        debug!(url = %url, "Tracker request");

        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl TrackerSession for HttpSession {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self.get(url, timeout).await?;
        Ok(response.text().await?)
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url, timeout).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// `Cookie` header value for the configured credentials.
pub fn cookie_header(config: &TrackerConfig) -> String {
    format!("uid={}; pass={};", config.uid.trim(), config.pass.trim())
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::ClientBuild(format!("invalid header value: {}", e)))
}
