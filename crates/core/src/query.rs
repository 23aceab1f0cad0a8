//! Search query generation.
//!
//! Turns a title (plus optional episode) into an ordered, duplicate-free
//! list of query strings, most specific first. The tracker's search is
//! literal and diacritic-sensitive, so we try several spellings:
//!
//! 1. The cleaned title as given (hostile punctuation and "TV Series"
//!    style suffixes removed)
//! 2. The same with diacritics stripped
//! 3. Optionally a dot-separated spelling
//! 4. The first few words only
//! 5. Without a leading article
//!
//! Every variant carries the `SxxEyy` tag when an episode was requested.

use std::collections::HashSet;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::media::EpisodeRef;
use crate::metadata::TitleInfo;
use crate::resolver::{ResolverConfig, TitleStrategy};

/// Characters the tracker's query parser chokes on.
const HOSTILE_CHARS: &[char] = &[
    ':', '(', ')', '[', ']', '{', '}', '"', '?', '!', '/', '\\', '|', ',', ';', '*', '#',
];

/// Annotations metadata sources append to series names.
const SUFFIX_PHRASES: &[&str] = &["tv mini-series", "tv mini series", "tv series", "miniseries"];

const LEADING_ARTICLES: &[&str] = &["the", "a", "an"];

/// Heuristic query generator.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    short_title_words: usize,
    min_query_len: usize,
    dotted_variant: bool,
    title_strategy: TitleStrategy,
}

impl Default for QueryGenerator {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl QueryGenerator {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            short_title_words: config.short_title_words.max(1),
            min_query_len: config.min_query_len,
            dotted_variant: config.dotted_variant,
            title_strategy: config.title_strategy,
        }
    }

    /// Generate queries for a title, most specific first.
    ///
    /// Returns an empty list only when no base name survives cleaning or
    /// every query is shorter than the minimum length.
    pub fn generate(&self, title: &TitleInfo, episode: Option<EpisodeRef>) -> Vec<String> {
        let tag = episode.map(|e| e.tag());
        let mut seen = HashSet::new();
        let mut queries = Vec::new();

        for base in self.base_names(title) {
            for (variant, separator) in self.variants(&base) {
                if variant.trim().is_empty() {
                    continue;
                }
                let query = match &tag {
                    Some(tag) => format!("{}{}{}", variant, separator, tag),
                    None => variant,
                };
                if query.chars().count() < self.min_query_len {
                    continue;
                }
                if seen.insert(query.clone()) {
                    queries.push(query);
                }
            }
        }

        queries
    }

    /// Base names in trial order, blank and repeated names removed.
    fn base_names(&self, title: &TitleInfo) -> Vec<String> {
        let display = Some(title.display_name.as_str());
        let alternate = title.alternate_name.as_deref();

        let ordered = match self.title_strategy {
            TitleStrategy::DisplayFirst => [display, alternate],
            TitleStrategy::OriginalFirst => [alternate, display],
        };

        let mut names: Vec<String> = Vec::with_capacity(2);
        for name in ordered.into_iter().flatten() {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Spelling variants of one base name, paired with the separator used
    /// before the episode tag.
    fn variants(&self, base: &str) -> Vec<(String, &'static str)> {
        let cleaned = sanitize(base);
        let stripped = strip_diacritics(&cleaned);

        let mut variants = vec![(cleaned, " "), (stripped.clone(), " ")];
        if self.dotted_variant {
            variants.push((dotted(&stripped), "."));
        }
        variants.push((shorten(&stripped, self.short_title_words), " "));
        if let Some(without) = drop_leading_article(&stripped) {
            variants.push((without, " "));
        }
        variants
    }
}

/// Remove diacritics by decomposing and dropping combining marks.
///
/// Idempotent: stripping an already stripped string is a no-op.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Remove characters and suffix phrases the tracker handles badly and
/// collapse whitespace.
pub fn sanitize(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if HOSTILE_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    let mut words: Vec<&str> = replaced
        .split_whitespace()
        .filter(|w| !w.chars().all(|c| c == '-' || c == '–'))
        .collect();

    loop {
        let joined = words.join(" ").to_lowercase();
        let Some(phrase) = SUFFIX_PHRASES
            .iter()
            .find(|p| joined.ends_with(&format!(" {}", p)))
        else {
            break;
        };
        let phrase_words = phrase.split_whitespace().count();
        words.truncate(words.len() - phrase_words);
    }

    words.join(" ")
}

/// First `count` whitespace-separated words.
pub fn shorten(title: &str, count: usize) -> String {
    title
        .split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

fn dotted(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(".")
}

fn drop_leading_article(title: &str) -> Option<String> {
    let mut words = title.split_whitespace();
    let first = words.next()?;
    if !LEADING_ARTICLES.contains(&first.to_lowercase().as_str()) {
        return None;
    }
    let rest = words.collect::<Vec<_>>().join(" ");
    (!rest.is_empty()).then_some(rest)
}
