//! Candidate filtering and presentation.
//!
//! Turns a resolved candidate into the stream record handed to clients:
//! rejects season packs for episode requests, strips noise the tracker
//! prepends to names, collects language markers and formats the title as
//!
//! ```text
//! <cleaned name>
//! 👤 <seeds>  📀 <size>
//! <flags>            (only when a known language code was found)
//! ```

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::descriptor::InfoHash;
use crate::media::MediaRequest;
use crate::resolver::ResolverConfig;
use crate::tracker::Candidate;

pub const SEEDS_ICON: &str = "👤";
pub const SIZE_ICON: &str = "📀";

/// Known two-letter language markers and their flags.
const LANGUAGE_FLAGS: &[(&str, &str)] = &[
    ("CZ", "🇨🇿"),
    ("SK", "🇸🇰"),
    ("EN", "🇬🇧"),
    ("US", "🇺🇸"),
    ("DE", "🇩🇪"),
    ("FR", "🇫🇷"),
    ("HU", "🇭🇺"),
    ("PL", "🇵🇱"),
];

static MULTI_SEASON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bS\d{1,2}\s*-\s*S?\d{1,2}\b",
        r"|\bcomplete\b",
        r"|\bkompletn",
        r"|\ball\s+episodes\b",
        r"|\bseasons?\s*\d{1,2}\s*-\s*\d{1,2}\b",
        r"|\b\d{1,2}\s*\.?\s*-\s*\d{1,2}\s*\.?\s*s[eé]ri",
    ))
    .unwrap()
});

/// A stream ready to be returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStream {
    /// Short source label.
    pub name: String,
    /// Multi-line display title.
    pub title: String,
    pub info_hash: InfoHash,
    /// Lets clients treat streams of one title as a binge group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
}

/// Whether `name` looks like a multi-season or complete-series pack.
pub fn is_multi_season_pack(name: &str) -> bool {
    MULTI_SEASON.is_match(name)
}

/// Flags for the known language codes in `name`, in order of appearance.
pub fn language_flags(name: &str) -> Vec<&'static str> {
    let mut flags = Vec::new();
    for token in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.len() != 2 || !token.chars().all(|c| c.is_ascii_uppercase()) {
            continue;
        }
        if let Some((_, flag)) = LANGUAGE_FLAGS.iter().find(|(code, _)| *code == token) {
            if !flags.contains(flag) {
                flags.push(*flag);
            }
        }
    }
    flags
}

/// Binge group key for an external id.
pub fn group_key(external_id: &str) -> String {
    format!("sktorrent|{}", external_id)
}

/// Applies the filtering and formatting rules to resolved candidates.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    noise_prefixes: Vec<String>,
    category_labels: Vec<String>,
    addon_name: String,
}

impl CandidateFilter {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            noise_prefixes: config.noise_prefixes.clone(),
            category_labels: config.category_labels.clone(),
            addon_name: config.addon_name.clone(),
        }
    }

    /// Build the stream for a candidate, or `None` if it is rejected.
    pub fn apply(
        &self,
        request: &MediaRequest,
        candidate: &Candidate,
        info_hash: InfoHash,
    ) -> Option<ResolvedStream> {
        if request.episode.is_some() && is_multi_season_pack(&candidate.name) {
            return None;
        }

        let name = self.clean_name(&candidate.name);
        let mut title = format!(
            "{}\n{} {}  {} {}",
            name, SEEDS_ICON, candidate.seed_count, SIZE_ICON, candidate.size_text
        );
        let flags = language_flags(&candidate.name);
        if !flags.is_empty() {
            title.push('\n');
            title.push_str(&flags.join(" "));
        }

        Some(ResolvedStream {
            name: self.addon_name.clone(),
            title,
            info_hash,
            group_key: Some(group_key(&request.external_id)),
        })
    }

    /// Strip configured noise prefixes and separated category labels,
    /// repeatedly, from the start of a name.
    ///
    /// A name that would end up empty is returned unchanged.
    pub fn clean_name(&self, name: &str) -> String {
        let mut rest = name.trim();
        while let Some(stripped) = self
            .noise_prefixes
            .iter()
            .find_map(|prefix| strip_word_prefix(rest, prefix))
            .or_else(|| {
                self.category_labels
                    .iter()
                    .find_map(|label| strip_label(rest, label))
            })
        {
            rest = stripped;
        }

        if rest.is_empty() {
            name.trim().to_string()
        } else {
            rest.to_string()
        }
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ':' | '-' | '–' | '|' | '.' | '/')
}

/// Remove `prefix` (case-insensitive, whole word) and any separator
/// punctuation after it.
fn strip_word_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = strip_head(s, prefix)?;
    Some(rest.trim_start_matches(|c: char| c.is_whitespace() || is_separator(c)))
}

/// Like [`strip_word_prefix`], but a label separator must follow. Dots do
/// not count: `Film.Stars.1080p` is a release name, not a category.
fn strip_label<'a>(s: &'a str, label: &str) -> Option<&'a str> {
    let rest = strip_head(s, label)?.trim_start();
    if !rest.starts_with(|c: char| c != '.' && is_separator(c)) {
        return None;
    }
    Some(rest.trim_start_matches(|c: char| c.is_whitespace() || is_separator(c)))
}

/// The text after a case-insensitive `prefix` ending on a word boundary.
fn strip_head<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix_chars = prefix.chars().count();
    if prefix_chars == 0 || s.chars().count() < prefix_chars {
        return None;
    }

    let end = s
        .char_indices()
        .nth(prefix_chars)
        .map_or(s.len(), |(i, _)| i);
    let (head, rest) = s.split_at(end);
    if head.to_lowercase() != prefix.to_lowercase() {
        return None;
    }
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some(rest)
}
