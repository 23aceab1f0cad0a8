//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing of the addon
//! endpoints without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sktorrent_core::{
    testing::{MockMetadata, MockSession},
    Config, MetadataLookup, ResolverConfig, ServerConfig, StreamResolver, TitleInfo,
    TrackerClient, TrackerSession,
};

/// Re-export fixtures for test convenience
pub use sktorrent_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Title lookups (MockMetadata)
/// - Tracker pages and torrent downloads (MockSession)
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock metadata source - configure titles
    pub metadata: Arc<MockMetadata>,
    /// Mock tracker session - configure pages and descriptors
    pub session: Arc<MockSession>,
    /// Tracker client sharing the mock session (for building search URLs)
    pub tracker: TrackerClient,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        let metadata = Arc::new(MockMetadata::new());
        let session = Arc::new(MockSession::new());

        let tracker_config = fixtures::tracker_config();
        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 7000, // Not used for in-process testing
            },
            tracker: tracker_config.clone(),
            resolver: ResolverConfig {
                total_timeout_secs: 5,
                ..Default::default()
            },
            ..Default::default()
        };

        let tracker = TrackerClient::new(
            Arc::clone(&session) as Arc<dyn TrackerSession>,
            &tracker_config,
        );
        let resolver = Arc::new(StreamResolver::new(
            Arc::clone(&metadata) as Arc<dyn MetadataLookup>,
            tracker.clone(),
            config.resolver.clone(),
        ));

        let state = Arc::new(sktorrent_server::state::AppState::new(config, resolver));
        let router = sktorrent_server::api::create_router(state);

        Self {
            router,
            metadata,
            session,
            tracker,
        }
    }

    /// Register a title and a results page for its first query.
    pub async fn with_title(&self, external_id: &str, title: &str, rows: &[String]) {
        self.metadata
            .set_title(external_id, TitleInfo::new(title))
            .await;
        self.session
            .set_page(&self.tracker.search_url(title), fixtures::results_page(rows))
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}
