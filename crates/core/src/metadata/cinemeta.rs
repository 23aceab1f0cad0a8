//! Cinemeta (Stremio's public metadata addon) client.
//!
//! No API key is required. Every lookup is a single
//! `GET {base}/meta/{type}/{id}.json`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::MetadataConfig;
use crate::media::MediaType;

use super::{MetadataError, MetadataLookup, TitleInfo};

/// Cinemeta metadata client.
pub struct CinemetaClient {
    client: Client,
    base_url: String,
}

impl CinemetaClient {
    /// Create a new Cinemeta client.
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn meta_url(&self, media_type: MediaType, external_id: &str) -> String {
        format!(
            "{}/meta/{}/{}.json",
            self.base_url,
            media_type,
            urlencoding::encode(external_id)
        )
    }
}

#[async_trait]
impl MetadataLookup for CinemetaClient {
    fn name(&self) -> &str {
        "cinemeta"
    }

    async fn lookup(
        &self,
        media_type: MediaType,
        external_id: &str,
    ) -> Result<Option<TitleInfo>, MetadataError> {
        let url = self.meta_url(media_type, external_id);
        debug!(url = %url, "Cinemeta lookup");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MetadataError::Timeout
            } else {
                MetadataError::HttpError(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body: CinemetaResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse meta response: {}", e))
        })?;

        Ok(body.meta.and_then(CinemetaMeta::into_title_info))
    }
}

// Cinemeta response types
#[derive(Debug, Deserialize)]
struct CinemetaResponse {
    #[serde(default)]
    meta: Option<CinemetaMeta>,
}

#[derive(Debug, Deserialize)]
struct CinemetaMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "originalName", alias = "original_title")]
    original_name: Option<String>,
}

impl CinemetaMeta {
    fn into_title_info(self) -> Option<TitleInfo> {
        let display_name = self.name.map(|n| n.trim().to_string())?;
        if display_name.is_empty() {
            return None;
        }

        let alternate_name = self
            .original_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty() && *n != display_name);

        Some(TitleInfo {
            display_name,
            alternate_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CinemetaClient {
        CinemetaClient::new(&MetadataConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_meta_url() {
        let client = client("https://v3-cinemeta.strem.io/");
        assert_eq!(
            client.meta_url(MediaType::Series, "tt0903747"),
            "https://v3-cinemeta.strem.io/meta/series/tt0903747.json"
        );
    }

    #[test]
    fn test_parse_meta_response() {
        let json = r#"{"meta": {"id": "tt0133093", "name": "The Matrix", "year": "1999"}}"#;
        let parsed: CinemetaResponse = serde_json::from_str(json).unwrap();
        let info = parsed.meta.and_then(CinemetaMeta::into_title_info).unwrap();
        assert_eq!(info.display_name, "The Matrix");
        assert!(info.alternate_name.is_none());
    }

    #[test]
    fn test_parse_meta_with_original_name() {
        let json = r#"{"meta": {"name": "Pelíšky", "originalName": "Cosy Dens"}}"#;
        let parsed: CinemetaResponse = serde_json::from_str(json).unwrap();
        let info = parsed.meta.and_then(CinemetaMeta::into_title_info).unwrap();
        assert_eq!(info.alternate_name.as_deref(), Some("Cosy Dens"));
    }

    #[test]
    fn test_identical_original_name_is_dropped() {
        let json = r#"{"meta": {"name": "Dune", "originalName": " Dune "}}"#;
        let parsed: CinemetaResponse = serde_json::from_str(json).unwrap();
        let info = parsed.meta.and_then(CinemetaMeta::into_title_info).unwrap();
        assert!(info.alternate_name.is_none());
    }

    #[test]
    fn test_missing_meta_or_blank_name() {
        let parsed: CinemetaResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.meta.is_none());

        let parsed: CinemetaResponse = serde_json::from_str(r#"{"meta": {"name": "  "}}"#).unwrap();
        assert!(parsed.meta.and_then(CinemetaMeta::into_title_info).is_none());
    }

    #[tokio::test]
    async fn test_lookup_unreachable_host_is_an_error() {
        let client = client("http://127.0.0.1:1");
        let result = client.lookup(MediaType::Movie, "tt0133093").await;
        assert!(result.is_err());
    }
}
