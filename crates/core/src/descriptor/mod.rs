//! Torrent descriptor resolution.
//!
//! Fetches a `.torrent` file through the tracker session and derives its
//! info-hash with librqbit-core: SHA-1 over the raw `info` dictionary,
//! rendered as 40 lowercase hex characters.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::tracker::{FetchError, TrackerSession};

/// How far into a payload to look for HTML markers.
const MARKUP_SNIFF_LEN: usize = 100;

/// A BitTorrent v1 info-hash as 40 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InfoHash(String);

impl InfoHash {
    /// Wrap a hex string, accepting only 40 hex digits (any case).
    pub fn parse(hex: &str) -> Option<Self> {
        (hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InfoHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        InfoHash::parse(&value).ok_or_else(|| format!("invalid info-hash: {}", value))
    }
}

impl From<InfoHash> for String {
    fn from(hash: InfoHash) -> Self {
        hash.0
    }
}

/// Why a candidate's descriptor could not be turned into a hash.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Descriptor fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Tracker returned markup instead of a torrent file")]
    Markup,

    #[error("Malformed torrent file: {0}")]
    Decode(String),
}

impl DescriptorError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DescriptorError::Fetch(FetchError::Timeout) => "timeout",
            DescriptorError::Fetch(_) => "fetch",
            DescriptorError::Markup => "markup",
            DescriptorError::Decode(_) => "decode",
        }
    }
}

/// Whether a payload looks like an HTML page rather than bencode.
///
/// The tracker answers unauthenticated or missing downloads with a normal
/// page, so anything starting with `<` or carrying an html/doctype marker
/// near the start is rejected before decoding.
pub fn looks_like_markup(bytes: &[u8]) -> bool {
    let trimmed = bytes
        .strip_prefix(b"\xEF\xBB\xBF")
        .unwrap_or(bytes)
        .trim_ascii_start();
    if trimmed.first() == Some(&b'<') {
        return true;
    }

    let head = &bytes[..bytes.len().min(MARKUP_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    head.contains("<html") || head.contains("<!doctype")
}

/// Compute the info-hash of a `.torrent` payload.
pub fn info_hash(bytes: &[u8]) -> Result<InfoHash, DescriptorError> {
    if looks_like_markup(bytes) {
        return Err(DescriptorError::Markup);
    }

    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| DescriptorError::Decode(e.to_string()))?;

    let hex = torrent.info_hash.as_string();
    InfoHash::parse(&hex)
        .ok_or_else(|| DescriptorError::Decode(format!("unexpected info-hash: {}", hex)))
}

/// Fetches descriptors through a tracker session and hashes them.
#[derive(Clone)]
pub struct DescriptorResolver {
    session: Arc<dyn TrackerSession>,
    timeout: Duration,
}

impl DescriptorResolver {
    pub fn new(session: Arc<dyn TrackerSession>, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    /// Fetch `url` and compute its info-hash.
    pub async fn resolve(&self, url: &str) -> Result<InfoHash, DescriptorError> {
        let bytes = self.session.fetch_bytes(url, self.timeout).await?;
        let hash = info_hash(&bytes)?;
        debug!(url = %url, info_hash = %hash, "Resolved descriptor");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockSession};

    const KNOWN_INFO: &[u8] =
        b"d6:lengthi1024e4:name8:file.mkv12:piece lengthi16384e6:pieces20:AAAAAAAAAAAAAAAAAAAAe";
    const KNOWN_HASH: &str = "577171398cf41b97f3396c717b42b696a5ade71d";

    #[test]
    fn test_info_hash_of_known_torrent() {
        let torrent = [&b"d8:announce14:http://tracker4:info"[..], KNOWN_INFO, &b"e"[..]].concat();

        let hash = info_hash(&torrent).unwrap();
        assert_eq!(hash.as_str(), KNOWN_HASH);
    }

    #[test]
    fn test_info_hash_with_unordered_outer_keys() {
        // info before announce: only the info dictionary is hashed
        let torrent = [&b"d4:info"[..], KNOWN_INFO, &b"8:announce3:urle"[..]].concat();

        let hash = info_hash(&torrent).unwrap();
        assert_eq!(hash.as_str(), KNOWN_HASH);
    }

    #[test]
    fn test_info_hash_is_stable() {
        let torrent = fixtures::torrent_bytes("Breaking.Bad.S01E01.mkv", 734_003_200);
        let a = info_hash(&torrent).unwrap();
        let b = info_hash(&torrent).unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_info_hash_ignores_outer_fields() {
        let a = fixtures::torrent_bytes_with_announce("movie.mkv", 100, "http://a/announce");
        let b = fixtures::torrent_bytes_with_announce("movie.mkv", 100, "http://b/announce");
        assert_eq!(info_hash(&a).unwrap(), info_hash(&b).unwrap());

        let c = fixtures::torrent_bytes("other.mkv", 100);
        assert_ne!(info_hash(&a).unwrap(), info_hash(&c).unwrap());
    }

    #[test]
    fn test_html_payload_is_rejected() {
        let page = b"<html><body>Prihlasenie</body></html>";
        assert!(matches!(info_hash(page), Err(DescriptorError::Markup)));
    }

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup(b"<!DOCTYPE html><html>"));
        assert!(looks_like_markup(b"   \n<html>"));
        assert!(looks_like_markup(b"\xEF\xBB\xBF<html>"));
        assert!(looks_like_markup(b"error text before <HTML> tag"));
        assert!(!looks_like_markup(b"d8:announce3:url4:infod4:name1:aee"));
    }

    #[test]
    fn test_missing_info_dictionary() {
        assert!(matches!(
            info_hash(b"d8:announce3:urle"),
            Err(DescriptorError::Decode(_))
        ));
        assert!(matches!(
            info_hash(b"d4:infoi1ee"),
            Err(DescriptorError::Decode(_))
        ));
        // top level is not a dictionary
        assert!(matches!(info_hash(b"li1ee"), Err(DescriptorError::Decode(_))));
    }

    #[test]
    fn test_malformed_bencode() {
        assert!(matches!(
            info_hash(b"d4:infod4:name"),
            Err(DescriptorError::Decode(_))
        ));
        assert!(matches!(info_hash(b""), Err(DescriptorError::Decode(_))));
        assert_eq!(
            DescriptorError::Decode("bad".to_string()).kind(),
            "decode"
        );
    }

    #[test]
    fn test_info_hash_parse() {
        let upper = "A94A8FE5CCB19BA61C4C0873D391E987982FBBD3";
        assert_eq!(
            InfoHash::parse(upper).unwrap().as_str(),
            "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3"
        );
        assert!(InfoHash::parse("abc").is_none());
        assert!(InfoHash::parse(&"g".repeat(40)).is_none());
    }

    #[test]
    fn test_info_hash_serde() {
        let hash = InfoHash::parse("a94a8fe5ccb19ba61c4c0873d391e987982fbbd3").unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"a94a8fe5ccb19ba61c4c0873d391e987982fbbd3\"");
        assert!(serde_json::from_str::<InfoHash>("\"nope\"").is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(DescriptorError::Markup.kind(), "markup");
        assert_eq!(DescriptorError::Fetch(FetchError::Timeout).kind(), "timeout");
        assert_eq!(DescriptorError::Fetch(FetchError::Status(500)).kind(), "fetch");
    }

    #[tokio::test]
    async fn test_resolver_uses_session() {
        let session = Arc::new(MockSession::new());
        let url = "https://tracker.test/torrent/download.php?id=7";
        let torrent = fixtures::torrent_bytes("file.mkv", 42);
        session.set_bytes(url, torrent.clone()).await;

        let resolver = DescriptorResolver::new(session.clone(), Duration::from_secs(5));
        let hash = resolver.resolve(url).await.unwrap();
        assert_eq!(hash, info_hash(&torrent).unwrap());
        assert_eq!(session.requested_urls().await, vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_resolver_reports_fetch_failure() {
        let session = Arc::new(MockSession::new());
        let resolver = DescriptorResolver::new(session, Duration::from_secs(5));
        let result = resolver.resolve("https://tracker.test/unknown").await;
        assert!(matches!(result, Err(DescriptorError::Fetch(_))));
    }
}
