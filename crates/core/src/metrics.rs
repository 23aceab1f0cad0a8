//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Resolution (outcomes, duration, streams emitted)
//! - Tracker (search pages, descriptor fetches)
//! - Metadata lookups

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Resolution Metrics
// =============================================================================

/// Resolutions total by outcome.
pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sktorrent_resolutions_total", "Total stream resolutions"),
        &["outcome"], // "streams", "no_title", "no_candidates", "auth_rejected", "timed_out"
    )
    .unwrap()
});

/// Resolution duration in seconds.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sktorrent_resolution_duration_seconds",
            "Duration of a whole stream resolution",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["outcome"],
    )
    .unwrap()
});

/// Queries generated per resolution.
pub static QUERIES_GENERATED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sktorrent_queries_generated",
            "Number of search queries generated per resolution",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 12.0]),
        &[],
    )
    .unwrap()
});

/// Streams returned to clients.
pub static STREAMS_EMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("sktorrent_streams_emitted_total", "Total streams returned").unwrap()
});

/// Candidates dropped by the filter.
pub static CANDIDATES_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sktorrent_candidates_rejected_total",
        "Total candidates rejected as season packs",
    )
    .unwrap()
});

// =============================================================================
// Tracker Metrics
// =============================================================================

/// Search queries by page outcome.
pub static SEARCH_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sktorrent_search_queries_total", "Total tracker searches"),
        &["result"], // "results", "empty", "login_required", "error"
    )
    .unwrap()
});

/// Descriptor resolutions by result.
pub static DESCRIPTOR_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sktorrent_descriptor_resolutions_total",
            "Total .torrent descriptor resolutions",
        ),
        &["result"], // "success", "timeout", "fetch", "markup", "decode"
    )
    .unwrap()
});

// =============================================================================
// Metadata Metrics
// =============================================================================

/// Metadata lookups by provider and status.
pub static METADATA_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sktorrent_metadata_lookups_total", "Total title lookups"),
        &["provider", "status"], // status: "found", "missing", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Resolution
        Box::new(RESOLUTIONS.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
        Box::new(QUERIES_GENERATED.clone()),
        Box::new(STREAMS_EMITTED.clone()),
        Box::new(CANDIDATES_REJECTED.clone()),
        // Tracker
        Box::new(SEARCH_QUERIES.clone()),
        Box::new(DESCRIPTOR_RESOLUTIONS.clone()),
        // Metadata
        Box::new(METADATA_LOOKUPS.clone()),
    ]
}
