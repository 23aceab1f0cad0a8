//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing the whole resolution pipeline to run without network
//! access.
//!
//! # Example
//!
//! ```rust,ignore
//! use sktorrent_core::testing::{fixtures, MockMetadata, MockSession};
//!
//! let metadata = MockMetadata::new();
//! let session = MockSession::new();
//!
//! // Configure responses
//! metadata.set_title("tt0133093", TitleInfo::new("The Matrix")).await;
//! session.set_page(&search_url, fixtures::results_page(&rows)).await;
//!
//! // Build a TrackerClient/StreamResolver on top...
//! ```

mod mock_metadata;
mod mock_session;

pub use mock_metadata::MockMetadata;
pub use mock_session::{MockSession, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::TrackerConfig;
    use crate::tracker::Candidate;

    /// Base URL used by all fixtures.
    pub const TRACKER_BASE: &str = "https://tracker.test";

    /// Tracker configuration pointing at the fixture host.
    pub fn tracker_config() -> TrackerConfig {
        TrackerConfig {
            base_url: TRACKER_BASE.to_string(),
            uid: "4242".to_string(),
            pass: "deadbeef".to_string(),
            ..Default::default()
        }
    }

    /// Descriptor URL the parser derives for `id` under [`tracker_config`].
    pub fn download_url(id: &str) -> String {
        format!("{}/torrent/download.php?id={}", TRACKER_BASE, id)
    }

    /// Create a candidate with reasonable defaults.
    pub fn candidate(id: &str, name: &str, size: &str, seeds: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            internal_id: id.to_string(),
            size_text: size.to_string(),
            seed_count: seeds.to_string(),
            descriptor_url: download_url(id),
        }
    }

    /// One result row the way the tracker renders it: a poster link and a
    /// text link to the details page, then size, date, seeds and leechers.
    pub fn result_row(id: &str, name: &str, size: &str, seeds: &str) -> String {
        let name = escape(name);
        format!(
            r#"<tr>
  <td class="lista"><a href="details.php?name={name}&amp;id={id}" title="{name}"><img src="/torrent/posters/{id}.jpg" alt="{name}"></a>
    <br><a href="details.php?name={name}&amp;id={id}">{name}</a></td>
  <td class="lista">Velkost {size}</td>
  <td class="lista">01/01/2024</td>
  <td class="lista">{seeds}</td>
  <td class="lista">0</td>
</tr>"#,
            name = name,
            id = id,
            size = size,
            seeds = seeds,
        )
    }

    /// A full results page wrapping `rows`.
    pub fn results_page(rows: &[String]) -> String {
        format!(
            r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>SKTorrent.eu</title></head>
<body>
<table class="lista" width="100%">
{}
</table>
</body></html>"#,
            rows.join("\n")
        )
    }

    /// The page the tracker serves when the session cookies are rejected.
    pub fn login_page() -> String {
        r#"<!DOCTYPE html>
<html><head><title>SKTorrent.eu</title></head>
<body>
<h1>Prihlásenie</h1>
<form method="post" action="login.php">
  <input type="text" name="uid"><input type="password" name="pwd">
  <input type="submit" name="login" value="Prihlásiť">
</form>
</body></html>"#
            .to_string()
    }

    /// A minimal single-file torrent.
    pub fn torrent_bytes(file_name: &str, length: i64) -> Vec<u8> {
        torrent_bytes_with_announce(file_name, length, "http://tracker.test/announce")
    }

    /// A minimal single-file torrent with a specific announce URL.
    pub fn torrent_bytes_with_announce(file_name: &str, length: i64, announce: &str) -> Vec<u8> {
        let mut torrent =
            format!("d8:announce{}:{}4:info", announce.len(), announce).into_bytes();
        torrent.extend_from_slice(&info_dict(file_name, length));
        torrent.push(b'e');
        torrent
    }

    /// Bencoded `info` dictionary, keys in canonical order.
    fn info_dict(file_name: &str, length: i64) -> Vec<u8> {
        let mut info = format!(
            "d6:lengthi{}e4:name{}:{}12:piece lengthi262144e6:pieces20:",
            length,
            file_name.len(),
            file_name
        )
        .into_bytes();
        info.extend_from_slice(&[0xab; 20]);
        info.push(b'e');
        info
    }

    fn escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}
