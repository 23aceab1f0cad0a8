//! Mock tracker session for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::tracker::{FetchError, TrackerSession};

/// A recorded request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The requested URL.
    pub url: String,
    /// The timeout the caller asked for.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
enum Scripted {
    Page(String),
    Bytes(Vec<u8>),
    Error(FetchError),
}

/// Mock implementation of the TrackerSession trait.
///
/// Responses are scripted per exact URL:
/// - Pages (text) and raw bytes
/// - Errors
/// - Per-URL delays; a delay at or above the caller's timeout turns into
///   [`FetchError::Timeout`] once the timeout elapses
///
/// Unscripted URLs answer with HTTP 404.
///
/// # Example
///
/// ```rust,ignore
/// use sktorrent_core::testing::{MockSession, fixtures};
///
/// let session = MockSession::new();
/// session.set_page(&url, fixtures::results_page(&rows)).await;
/// session.set_bytes(&fixtures::download_url("1"), fixtures::torrent_bytes("a.mkv", 1)).await;
///
/// // ... run the code under test ...
///
/// assert_eq!(session.requested_urls().await.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockSession {
    responses: Arc<RwLock<HashMap<String, Scripted>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockSession {
    /// Create a mock session with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub async fn set_page(&self, url: &str, html: impl Into<String>) {
        self.script(url, Scripted::Page(html.into())).await;
    }

    /// Serve raw `bytes` for `url`.
    pub async fn set_bytes(&self, url: &str, bytes: Vec<u8>) {
        self.script(url, Scripted::Bytes(bytes)).await;
    }

    /// Fail requests to `url` with `error`.
    pub async fn set_error(&self, url: &str, error: FetchError) {
        self.script(url, Scripted::Error(error)).await;
    }

    /// Delay responses for `url`.
    pub async fn set_delay(&self, url: &str, delay: Duration) {
        self.delays.write().await.insert(url.to_string(), delay);
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// URLs requested so far, in order.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests
            .read()
            .await
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }

    async fn script(&self, url: &str, response: Scripted) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), response);
    }

    async fn respond(&self, url: &str, timeout: Duration) -> Result<Scripted, FetchError> {
        self.requests.write().await.push(RecordedRequest {
            url: url.to_string(),
            timeout,
        });

        let delay = self.delays.read().await.get(url).copied();
        if let Some(delay) = delay {
            if delay >= timeout {
                tokio::time::sleep(timeout).await;
                return Err(FetchError::Timeout);
            }
            tokio::time::sleep(delay).await;
        }

        match self.responses.read().await.get(url) {
            Some(Scripted::Error(e)) => Err(e.clone()),
            Some(response) => Ok(response.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}

#[async_trait]
impl TrackerSession for MockSession {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        match self.respond(url, timeout).await? {
            Scripted::Page(html) => Ok(html),
            Scripted::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Scripted::Error(e) => Err(e),
        }
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        match self.respond(url, timeout).await? {
            Scripted::Page(html) => Ok(html.into_bytes()),
            Scripted::Bytes(bytes) => Ok(bytes),
            Scripted::Error(e) => Err(e),
        }
    }
}
