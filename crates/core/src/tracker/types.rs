//! Types for tracker search results.

use serde::{Deserialize, Serialize};

/// A single scraped search result, before its descriptor is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Release name as shown by the tracker.
    pub name: String,
    /// Tracker-assigned id, unique within one results page.
    pub internal_id: String,
    /// Free-form size text, e.g. "1.4 GB".
    pub size_text: String,
    /// Seeder count as displayed (not necessarily numeric).
    pub seed_count: String,
    /// Where to fetch the `.torrent` file.
    pub descriptor_url: String,
}

/// Outcome of parsing one search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    /// At least one entry, in document order.
    Results(Vec<Candidate>),
    /// The page had no entries.
    Empty,
    /// The tracker served a login form instead of results.
    LoginRequired,
}

impl SearchPage {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            SearchPage::Results(candidates) => candidates,
            _ => &[],
        }
    }

    /// Label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchPage::Results(_) => "results",
            SearchPage::Empty => "empty",
            SearchPage::LoginRequired => "login_required",
        }
    }
}
