//! Stream resolver implementation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::descriptor::{DescriptorError, DescriptorResolver, InfoHash};
use crate::filter::{CandidateFilter, ResolvedStream};
use crate::media::{MediaRequest, MediaType};
use crate::metadata::{MetadataLookup, TitleInfo};
use crate::metrics;
use crate::query::QueryGenerator;
use crate::tracker::{Candidate, SearchPage, TrackerClient};

use super::config::ResolverConfig;
use super::types::Resolution;

/// Resolves media requests into playable streams.
pub struct StreamResolver {
    metadata: Arc<dyn MetadataLookup>,
    tracker: TrackerClient,
    descriptors: DescriptorResolver,
    queries: QueryGenerator,
    filter: CandidateFilter,
    config: ResolverConfig,
}

impl StreamResolver {
    /// Create a new resolver.
    pub fn new(
        metadata: Arc<dyn MetadataLookup>,
        tracker: TrackerClient,
        config: ResolverConfig,
    ) -> Self {
        Self {
            metadata,
            descriptors: tracker.descriptors(),
            tracker,
            queries: QueryGenerator::new(&config),
            filter: CandidateFilter::new(&config),
            config,
        }
    }

    /// Resolve streams for a Stremio-style id (`tt0903747` or
    /// `tt0903747:1:5`). Never fails; problems yield an empty list.
    pub async fn resolve_streams(
        &self,
        media_type: MediaType,
        external_id: &str,
    ) -> Vec<ResolvedStream> {
        match MediaRequest::parse(media_type, external_id) {
            Ok(request) => self.resolve(&request).await.into_streams(),
            Err(e) => {
                warn!(id = %external_id, error = %e, "Rejected stream request");
                Vec::new()
            }
        }
    }

    /// Resolve a request, reporting how it ended.
    pub async fn resolve(&self, request: &MediaRequest) -> Resolution {
        let started = Instant::now();
        let budget = Duration::from_secs(self.config.total_timeout_secs);

        let resolution = match tokio::time::timeout(budget, self.run(request)).await {
            Ok(resolution) => resolution,
            Err(_) => {
                warn!(
                    id = %request.external_id,
                    budget_secs = self.config.total_timeout_secs,
                    "Resolution timed out"
                );
                Resolution::TimedOut
            }
        };

        let elapsed = started.elapsed();
        metrics::RESOLUTIONS
            .with_label_values(&[resolution.kind()])
            .inc();
        metrics::RESOLUTION_DURATION
            .with_label_values(&[resolution.kind()])
            .observe(elapsed.as_secs_f64());
        metrics::STREAMS_EMITTED.inc_by(resolution.streams().len() as u64);

        info!(
            media_type = %request.media_type,
            id = %request.external_id,
            episode = request.episode.map(|e| e.tag()).unwrap_or_default(),
            outcome = resolution.kind(),
            streams = resolution.streams().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Resolution finished"
        );

        resolution
    }

    async fn run(&self, request: &MediaRequest) -> Resolution {
        let Some(title) = self.lookup_title(request).await else {
            return Resolution::NoTitle;
        };

        let queries = self.queries.generate(&title, request.episode);
        metrics::QUERIES_GENERATED
            .with_label_values(&[])
            .observe(queries.len() as f64);
        if queries.is_empty() {
            warn!(title = %title.display_name, "No usable search query for title");
            return Resolution::NoCandidates;
        }

        let candidates = match self.collect_candidates(&queries).await {
            SearchPage::Results(candidates) => candidates,
            SearchPage::Empty => return Resolution::NoCandidates,
            SearchPage::LoginRequired => return Resolution::AuthRejected,
        };

        let streams: Vec<ResolvedStream> = self
            .resolve_descriptors(candidates)
            .await
            .into_iter()
            .filter_map(|(candidate, hash)| {
                let stream = self.filter.apply(request, &candidate, hash);
                if stream.is_none() {
                    metrics::CANDIDATES_REJECTED.inc();
                    debug!(name = %candidate.name, "Rejected season pack");
                }
                stream
            })
            .collect();

        if streams.is_empty() {
            Resolution::NoCandidates
        } else {
            Resolution::Streams(streams)
        }
    }

    async fn lookup_title(&self, request: &MediaRequest) -> Option<TitleInfo> {
        let provider = self.metadata.name();
        match self
            .metadata
            .lookup(request.media_type, &request.external_id)
            .await
        {
            Ok(Some(title)) => {
                metrics::METADATA_LOOKUPS
                    .with_label_values(&[provider, "found"])
                    .inc();
                debug!(
                    provider = provider,
                    title = %title.display_name,
                    alternate = title.alternate_name.as_deref().unwrap_or(""),
                    "Title found"
                );
                Some(title)
            }
            Ok(None) => {
                metrics::METADATA_LOOKUPS
                    .with_label_values(&[provider, "missing"])
                    .inc();
                info!(provider = provider, id = %request.external_id, "Title not found");
                None
            }
            Err(e) => {
                metrics::METADATA_LOOKUPS
                    .with_label_values(&[provider, "error"])
                    .inc();
                warn!(provider = provider, id = %request.external_id, error = %e, "Title lookup failed");
                None
            }
        }
    }

    /// Try queries in order until enough distinct candidates are collected.
    async fn collect_candidates(&self, queries: &[String]) -> SearchPage {
        let mut seen = HashSet::new();
        let mut collected: Vec<Candidate> = Vec::new();

        for (attempt, query) in queries.iter().enumerate() {
            let page = match self.tracker.search(query).await {
                Ok(page) => page,
                Err(e) => {
                    metrics::SEARCH_QUERIES.with_label_values(&["error"]).inc();
                    warn!(query = %query, error = %e, "Search failed");
                    continue;
                }
            };
            metrics::SEARCH_QUERIES
                .with_label_values(&[page.kind()])
                .inc();

            let found = match page {
                SearchPage::Results(found) => found,
                SearchPage::Empty => {
                    debug!(query = %query, attempt = attempt + 1, "No results");
                    continue;
                }
                SearchPage::LoginRequired => {
                    error!(
                        query = %query,
                        "Tracker requires login; check tracker.uid and tracker.pass"
                    );
                    return SearchPage::LoginRequired;
                }
            };

            let before = collected.len();
            for candidate in found {
                if seen.insert(candidate.internal_id.clone()) {
                    collected.push(candidate);
                }
            }
            debug!(
                query = %query,
                attempt = attempt + 1,
                new = collected.len() - before,
                total = collected.len(),
                "Collected candidates"
            );

            if collected.len() >= self.config.min_candidates {
                break;
            }
        }

        if collected.is_empty() {
            return SearchPage::Empty;
        }
        collected.truncate(self.config.max_candidates);
        SearchPage::Results(collected)
    }

    /// Fetch descriptors concurrently; output keeps candidate order and
    /// omits candidates whose descriptor failed.
    async fn resolve_descriptors(&self, candidates: Vec<Candidate>) -> Vec<(Candidate, InfoHash)> {
        let mut results: Vec<(usize, Candidate, Result<InfoHash, DescriptorError>)> =
            stream::iter(candidates.into_iter().enumerate())
                .map(|(idx, candidate)| {
                    let descriptors = self.descriptors.clone();
                    async move {
                        let result = descriptors.resolve(&candidate.descriptor_url).await;
                        (idx, candidate, result)
                    }
                })
                .buffer_unordered(self.config.max_concurrent_fetches.max(1))
                .collect()
                .await;

        results.sort_by_key(|(idx, _, _)| *idx);

        results
            .into_iter()
            .filter_map(|(_, candidate, result)| match result {
                Ok(hash) => {
                    metrics::DESCRIPTOR_RESOLUTIONS
                        .with_label_values(&["success"])
                        .inc();
                    Some((candidate, hash))
                }
                Err(e) => {
                    metrics::DESCRIPTOR_RESOLUTIONS
                        .with_label_values(&[e.kind()])
                        .inc();
                    warn!(name = %candidate.name, id = %candidate.internal_id, error = %e, "Dropping candidate");
                    None
                }
            })
            .collect()
    }
}
