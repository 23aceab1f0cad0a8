//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Which title the query generator tries first when the metadata lookup
/// returns both a display name and an original name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStrategy {
    /// Localized display name first, original name second.
    #[default]
    DisplayFirst,
    /// Original name first, display name second.
    OriginalFirst,
}

/// Configuration for the stream resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Number of leading words kept by the shortened query variant.
    #[serde(default = "default_short_title_words")]
    pub short_title_words: usize,

    /// Queries whose title part is shorter than this are dropped.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Also emit a dot-separated spelling ("Breaking.Bad.S01E01").
    #[serde(default)]
    pub dotted_variant: bool,

    #[serde(default)]
    pub title_strategy: TitleStrategy,

    /// Stop trying further queries once this many distinct candidates
    /// have been collected. 1 = stop at the first non-empty query.
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,

    /// Upper bound on candidates whose descriptors get fetched.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Maximum concurrent .torrent fetches within one resolution.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Wall-clock budget for a whole resolution (seconds).
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,

    /// Leading phrases stripped from scraped torrent names.
    #[serde(default = "default_noise_prefixes")]
    pub noise_prefixes: Vec<String>,

    /// Category labels stripped only when a separator (`:`, `-`, `|`, `/`)
    /// follows them, so titles starting with the same word survive.
    #[serde(default = "default_category_labels")]
    pub category_labels: Vec<String>,

    /// Label shown as the stream `name` in clients.
    #[serde(default = "default_addon_name")]
    pub addon_name: String,
}

fn default_short_title_words() -> usize {
    3
}

fn default_min_query_len() -> usize {
    3
}

fn default_min_candidates() -> usize {
    1
}

fn default_max_candidates() -> usize {
    20
}

fn default_max_concurrent_fetches() -> usize {
    5
}

fn default_total_timeout() -> u64 {
    25
}

fn default_noise_prefixes() -> Vec<String> {
    ["Download this", "Stiahni si", "Stiahnut"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_category_labels() -> Vec<String> {
    [
        "Filmy",
        "Film",
        "Seriály",
        "Serialy",
        "Seriál",
        "Serial",
        "Movies",
        "TV",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_addon_name() -> String {
    "SKTorrent".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            short_title_words: default_short_title_words(),
            min_query_len: default_min_query_len(),
            dotted_variant: false,
            title_strategy: TitleStrategy::default(),
            min_candidates: default_min_candidates(),
            max_candidates: default_max_candidates(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            total_timeout_secs: default_total_timeout(),
            noise_prefixes: default_noise_prefixes(),
            category_labels: default_category_labels(),
            addon_name: default_addon_name(),
        }
    }
}
