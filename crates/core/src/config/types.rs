use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::resolver::ResolverConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    7000
}

/// Tracker (SKTorrent) connection settings.
///
/// `uid` and `pass` are the values of the site's session cookies, copied
/// from a logged-in browser. They are never logged or serialized back out
/// through [`SanitizedConfig`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Site root (e.g., "https://sktorrent.eu").
    #[serde(default = "default_tracker_url")]
    pub base_url: String,
    /// Path of the search-results page.
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Path of the .torrent download endpoint.
    #[serde(default = "default_download_path")]
    pub download_path: String,
    /// Category filter passed with every search (0 = all).
    #[serde(default)]
    pub category: u32,
    /// Value of the `uid` cookie.
    #[serde(default)]
    pub uid: String,
    /// Value of the `pass` cookie (the hash, not the plain password).
    #[serde(default)]
    pub pass: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for a single search-page fetch.
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
    /// Timeout for a single .torrent fetch.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl TrackerConfig {
    /// Whether both session cookies are present.
    pub fn has_credentials(&self) -> bool {
        !self.uid.trim().is_empty() && !self.pass.trim().is_empty()
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: default_tracker_url(),
            search_path: default_search_path(),
            download_path: default_download_path(),
            category: 0,
            uid: String::new(),
            pass: String::new(),
            user_agent: default_user_agent(),
            search_timeout_secs: default_search_timeout(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

fn default_tracker_url() -> String {
    "https://sktorrent.eu".to_string()
}

fn default_search_path() -> String {
    "/torrent/torrents_v2.php".to_string()
}

fn default_download_path() -> String {
    "/torrent/download.php".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_search_timeout() -> u64 {
    10
}

fn default_download_timeout() -> u64 {
    8
}

/// Metadata (Cinemeta) lookup settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_url")]
    pub base_url: String,
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_metadata_url(),
            timeout_secs: default_metadata_timeout(),
        }
    }
}

fn default_metadata_url() -> String {
    "https://v3-cinemeta.strem.io".to_string()
}

fn default_metadata_timeout() -> u64 {
    7
}

/// Sanitized config for API responses (credentials redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub tracker: SanitizedTrackerConfig,
    pub metadata: MetadataConfig,
    pub resolver: ResolverConfig,
}

/// Tracker config with the cookie values hidden.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrackerConfig {
    pub base_url: String,
    pub search_path: String,
    pub download_path: String,
    pub category: u32,
    pub uid_configured: bool,
    pub pass_configured: bool,
    pub search_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let tracker = &config.tracker;
        Self {
            server: config.server.clone(),
            tracker: SanitizedTrackerConfig {
                base_url: tracker.base_url.clone(),
                search_path: tracker.search_path.clone(),
                download_path: tracker.download_path.clone(),
                category: tracker.category,
                uid_configured: !tracker.uid.trim().is_empty(),
                pass_configured: !tracker.pass.trim().is_empty(),
                search_timeout_secs: tracker.search_timeout_secs,
                download_timeout_secs: tracker.download_timeout_secs,
            },
            metadata: config.metadata.clone(),
            resolver: config.resolver.clone(),
        }
    }
}
