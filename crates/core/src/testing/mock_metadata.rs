//! Mock metadata source for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::MediaType;
use crate::metadata::{MetadataError, MetadataLookup, TitleInfo};

/// Mock implementation of the MetadataLookup trait.
///
/// Titles are keyed by external id; the media type is recorded but not
/// used for matching. Unknown ids resolve to `Ok(None)`.
#[derive(Debug, Default)]
pub struct MockMetadata {
    titles: Arc<RwLock<HashMap<String, TitleInfo>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    lookups: Arc<RwLock<Vec<(MediaType, String)>>>,
}

impl MockMetadata {
    /// Create a mock with no known titles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups for `external_id` with `title`.
    pub async fn set_title(&self, external_id: &str, title: TitleInfo) {
        self.titles
            .write()
            .await
            .insert(external_id.to_string(), title);
    }

    /// Make lookups for `external_id` fail.
    pub async fn set_error(&self, external_id: &str) {
        self.failing.write().await.insert(external_id.to_string());
    }

    /// Lookups made so far.
    pub async fn lookups(&self) -> Vec<(MediaType, String)> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl MetadataLookup for MockMetadata {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(
        &self,
        media_type: MediaType,
        external_id: &str,
    ) -> Result<Option<TitleInfo>, MetadataError> {
        self.lookups
            .write()
            .await
            .push((media_type, external_id.to_string()));

        if self.failing.read().await.contains(external_id) {
            return Err(MetadataError::ApiError {
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        Ok(self.titles.read().await.get(external_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_unknown_and_failing_ids() {
        let metadata = MockMetadata::new();
        metadata.set_title("tt1", TitleInfo::new("One")).await;
        metadata.set_error("tt2").await;

        let found = metadata.lookup(MediaType::Movie, "tt1").await.unwrap();
        assert_eq!(found, Some(TitleInfo::new("One")));
        assert!(metadata.lookup(MediaType::Movie, "tt2").await.is_err());
        assert!(metadata
            .lookup(MediaType::Series, "tt3")
            .await
            .unwrap()
            .is_none());

        let lookups = metadata.lookups().await;
        assert_eq!(lookups.len(), 3);
        assert_eq!(lookups[2], (MediaType::Series, "tt3".to_string()));
    }
}
