//! Title metadata lookup.
//!
//! The resolver only needs a display name (and optionally an original
//! name) for a catalog id. [`CinemetaClient`] is the production source.

mod cinemeta;

pub use cinemeta::CinemetaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::MediaType;

/// Names of a title as reported by the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleInfo {
    /// Name shown to users (may be localized).
    pub display_name: String,
    /// Original-language name, when the source knows it and it differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
}

impl TitleInfo {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            alternate_name: None,
        }
    }

    pub fn with_alternate(mut self, alternate_name: impl Into<String>) -> Self {
        self.alternate_name = Some(alternate_name.into());
        self
    }
}

/// Errors that can occur when looking up metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Metadata request timed out")]
    Timeout,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Source of title names for catalog ids.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Look up the names for `external_id`.
    ///
    /// `Ok(None)` means the source answered but does not know the title.
    async fn lookup(
        &self,
        media_type: MediaType,
        external_id: &str,
    ) -> Result<Option<TitleInfo>, MetadataError>;
}
