//! Search client for the tracker.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::TrackerConfig;
use crate::descriptor::DescriptorResolver;

use super::parser::ResultsParser;
use super::session::{FetchError, TrackerSession};
use super::types::SearchPage;

/// Runs searches against the tracker and parses the result pages.
#[derive(Clone)]
pub struct TrackerClient {
    session: Arc<dyn TrackerSession>,
    parser: ResultsParser,
    search_url: String,
    category: u32,
    search_timeout: Duration,
    download_timeout: Duration,
}

impl TrackerClient {
    pub fn new(session: Arc<dyn TrackerSession>, config: &TrackerConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        Self {
            session,
            parser: ResultsParser::new(format!("{}{}", base, config.download_path)),
            search_url: format!("{}{}", base, config.search_path),
            category: config.category,
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
        }
    }

    /// Full search URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?search={}&category={}",
            self.search_url,
            urlencoding::encode(query),
            self.category
        )
    }

    /// Search for `query` and parse the result page.
    ///
    /// Blank queries are answered with [`SearchPage::Empty`] without touching
    /// the network: the tracker treats them as "latest uploads".
    pub async fn search(&self, query: &str) -> Result<SearchPage, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Refusing blank search query");
            return Ok(SearchPage::Empty);
        }

        let html = self
            .session
            .fetch_text(&self.search_url(query), self.search_timeout)
            .await?;
        let page = self.parser.parse(&html);

        debug!(
            query = %query,
            outcome = page.kind(),
            candidates = page.candidates().len(),
            "Search page parsed"
        );
        Ok(page)
    }

    /// Descriptor resolver sharing this client's session.
    pub fn descriptors(&self) -> DescriptorResolver {
        DescriptorResolver::new(self.session.clone(), self.download_timeout)
    }
}
