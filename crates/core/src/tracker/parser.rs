//! Tolerant parser for SKTorrent search result pages.
//!
//! The markup is inconsistent between page variants, so entries are found
//! by their links rather than by table position: every anchor whose target
//! page is exactly `details.php` or `download.php` and carries an `id` is an
//! entry (`userdetails.php` and friends are not). The display name
//! comes from the first [`NameStrategy`] that yields one, and size/seeds are
//! read from the sibling cells of the enclosing table row.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};

use super::types::{Candidate, SearchPage};

/// Placeholder when a row has no recognizable size cell.
pub const UNKNOWN_SIZE: &str = "unknown size";

const MIN_NAME_LEN: usize = 2;

/// Pages whose links identify a torrent entry.
const ENTRY_PAGES: &[&str] = &["details.php", "download.php"];

/// Markers of the tracker's login page.
const LOGIN_MARKERS: &[&str] = &["name=\"login\"", "Prihlásenie", "Prihlasenie"];

static ENTRY_LINKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href*="details.php?"], a[href*="download.php?"]"#).unwrap()
});

static IMAGES_WITH_ALT: Lazy<Selector> = Lazy::new(|| Selector::parse("img[alt]").unwrap());

static SIZE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+(?:[.,]\d+)?\s*(?:KB|MB|GB|TB)\b").unwrap());

/// One way of reading an entry's display name from its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// The link's `title` attribute.
    TitleAttribute,
    /// The link's own text.
    LinkText,
    /// The `alt` of an image inside the link (poster-style rows).
    ImageAlt,
}

impl NameStrategy {
    pub const DEFAULT_CHAIN: [NameStrategy; 3] = [
        NameStrategy::TitleAttribute,
        NameStrategy::LinkText,
        NameStrategy::ImageAlt,
    ];

    /// Try to read a name, returning `None` if this strategy has nothing.
    pub fn extract(&self, link: ElementRef<'_>) -> Option<String> {
        let raw = match self {
            NameStrategy::TitleAttribute => link.value().attr("title").map(str::to_string),
            NameStrategy::LinkText => Some(link.text().collect::<String>()),
            NameStrategy::ImageAlt => link
                .select(&IMAGES_WITH_ALT)
                .filter_map(|img| img.value().attr("alt"))
                .map(str::to_string)
                .find(|alt| !alt.trim().is_empty()),
        }?;

        let name = collapse_whitespace(&raw);
        (name.chars().count() >= MIN_NAME_LEN).then_some(name)
    }
}

/// Parses search result pages into [`Candidate`]s.
#[derive(Debug, Clone)]
pub struct ResultsParser {
    download_base: String,
    strategies: Vec<NameStrategy>,
}

impl ResultsParser {
    /// `download_base` is the descriptor endpoint; `?id=<id>` is appended.
    pub fn new(download_base: impl Into<String>) -> Self {
        Self {
            download_base: download_base.into(),
            strategies: NameStrategy::DEFAULT_CHAIN.to_vec(),
        }
    }

    /// Replace the name strategy chain.
    pub fn with_strategies(mut self, strategies: Vec<NameStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Parse a results page.
    pub fn parse(&self, html: &str) -> SearchPage {
        let candidates = self.candidates(html);
        if !candidates.is_empty() {
            return SearchPage::Results(candidates);
        }
        if LOGIN_MARKERS.iter().any(|m| html.contains(m)) {
            return SearchPage::LoginRequired;
        }
        SearchPage::Empty
    }

    fn candidates(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for link in document.select(&ENTRY_LINKS) {
            let Some(id) = link.value().attr("href").and_then(entry_id) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            let Some(name) = self.name_of(link) else {
                continue;
            };
            seen.insert(id.clone());

            let cells = row_cells(link);
            candidates.push(Candidate {
                name,
                size_text: size_of(&cells),
                seed_count: seeds_of(&cells),
                descriptor_url: format!(
                    "{}?id={}",
                    self.download_base,
                    urlencoding::encode(&id)
                ),
                internal_id: id,
            });
        }

        candidates
    }

    fn name_of(&self, link: ElementRef<'_>) -> Option<String> {
        self.strategies.iter().find_map(|s| s.extract(link))
    }
}

/// The `id` query parameter of an entry link; `None` for links to any
/// other page.
fn entry_id(href: &str) -> Option<String> {
    let (path, query) = href.split_once('?')?;
    let page = path.rsplit('/').next().unwrap_or_default();
    if !ENTRY_PAGES.contains(&page) {
        return None;
    }
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Text of the `td` cells of the row enclosing `link`, or nothing when the
/// link is not inside a table row.
fn row_cells(link: ElementRef<'_>) -> Vec<String> {
    let Some(row) = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
    else {
        return Vec::new();
    };

    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .map(|td| collapse_whitespace(&td.text().collect::<String>()))
        .collect()
}

fn size_of(cells: &[String]) -> String {
    cells
        .iter()
        .find_map(|cell| SIZE_PATTERN.find(cell))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_SIZE.to_string())
}

fn seeds_of(cells: &[String]) -> String {
    cells
        .len()
        .checked_sub(2)
        .and_then(|i| cells.get(i))
        .filter(|text| !text.is_empty())
        .cloned()
        .unwrap_or_else(|| "0".to_string())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    const DOWNLOAD: &str = "https://tracker.test/torrent/download.php";

    fn parser() -> ResultsParser {
        ResultsParser::new(DOWNLOAD)
    }

    #[test]
    fn test_parses_rows_in_document_order() {
        let html = fixtures::results_page(&[
            fixtures::result_row("111", "The Matrix 1999 1080p CZ", "8.2 GB", "42"),
            fixtures::result_row("222", "The Matrix 1999 720p SK", "1.4 GB", "7"),
        ]);

        let page = parser().parse(&html);
        let candidates = page.candidates();
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].name, "The Matrix 1999 1080p CZ");
        assert_eq!(candidates[0].internal_id, "111");
        assert_eq!(candidates[0].size_text, "8.2 GB");
        assert_eq!(candidates[0].seed_count, "42");
        assert_eq!(
            candidates[0].descriptor_url,
            "https://tracker.test/torrent/download.php?id=111"
        );
        assert_eq!(candidates[1].internal_id, "222");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let html = fixtures::results_page(&[
            fixtures::result_row("111", "First", "1 GB", "1"),
            fixtures::result_row("111", "Second", "2 GB", "2"),
        ]);

        let page = parser().parse(&html);
        assert_eq!(page.candidates().len(), 1);
        assert_eq!(page.candidates()[0].name, "First");
    }

    #[test]
    fn test_login_page_is_reported() {
        let html = fixtures::login_page();
        assert_eq!(parser().parse(&html), SearchPage::LoginRequired);
    }

    #[test]
    fn test_empty_results_page() {
        let html = fixtures::results_page(&[]);
        assert_eq!(parser().parse(&html), SearchPage::Empty);
        assert_eq!(parser().parse(""), SearchPage::Empty);
    }

    #[test]
    fn test_results_win_over_login_marker() {
        // header login box on a page that still lists results
        let html = format!(
            "<form><input name=\"login\"></form>{}",
            fixtures::results_page(&[fixtures::result_row("5", "Dune", "3 GB", "9")])
        );
        assert!(matches!(parser().parse(&html), SearchPage::Results(_)));
    }

    #[test]
    fn test_name_falls_back_to_text_then_image_alt() {
        let html = r#"<table>
            <tr><td><a href="details.php?id=1">  Link   text name </a></td><td>700 MB</td><td>3</td><td>x</td></tr>
            <tr><td><a href="details.php?id=2"><img src="p.jpg" alt="Poster Name"></a></td><td>1,5 GB</td><td>4</td><td>x</td></tr>
        </table>"#;

        let page = parser().parse(html);
        let names: Vec<_> = page.candidates().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Link text name", "Poster Name"]);
        assert_eq!(page.candidates()[1].size_text, "1,5 GB");
    }

    #[test]
    fn test_custom_strategy_chain() {
        let html = r#"<table><tr><td><a href="details.php?id=1" title="From title">From text</a></td></tr></table>"#;
        let page = parser()
            .with_strategies(vec![NameStrategy::LinkText])
            .parse(html);
        assert_eq!(page.candidates()[0].name, "From text");
    }

    #[test]
    fn test_nameless_links_are_skipped() {
        // an icon-only download link must not claim the id before the named link
        let html = r#"<table><tr>
            <td><a href="download.php?id=9&f=x.torrent"><img src="dl.gif"></a></td>
            <td><a href="details.php?name=x&id=9" title="Named Entry">Named Entry</a></td>
            <td>2 GB</td><td>11</td><td>0</td>
        </tr></table>"#;

        let page = parser().parse(html);
        assert_eq!(page.candidates().len(), 1);
        assert_eq!(page.candidates()[0].name, "Named Entry");
        assert_eq!(page.candidates()[0].seed_count, "11");
    }

    #[test]
    fn test_row_without_size_or_cells() {
        let html = r#"<div><a href="details.php?id=77" title="Loose Link">x</a></div>"#;
        let page = parser().parse(html);
        let candidate = &page.candidates()[0];
        assert_eq!(candidate.size_text, UNKNOWN_SIZE);
        assert_eq!(candidate.seed_count, "0");
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id("details.php?id=abc").as_deref(), Some("abc"));
        assert_eq!(entry_id("details.php?name=x&id=12#top").as_deref(), Some("12"));
        assert_eq!(entry_id("download.php?id=a%20b").as_deref(), Some("a b"));
        assert_eq!(entry_id("details.php?name=x"), None);
        assert_eq!(entry_id("details.php?id="), None);
        assert_eq!(entry_id("details.php"), None);
        assert_eq!(entry_id("/torrent/details.php?id=5").as_deref(), Some("5"));
        assert_eq!(
            entry_id("https://tracker.test/torrent/download.php?id=6").as_deref(),
            Some("6")
        );
        assert_eq!(entry_id("userdetails.php?id=4242"), None);
        assert_eq!(entry_id("/torrent/mydownload.php?id=1"), None);
    }

    #[test]
    fn test_profile_links_are_not_entries() {
        let header = r#"<div class="header">Prihlaseny: <a href="userdetails.php?id=4242">someuser</a></div>"#;
        assert_eq!(parser().parse(header), SearchPage::Empty);

        let html = format!(
            "{}{}",
            header,
            fixtures::results_page(&[fixtures::result_row("5", "Dune", "3 GB", "9")])
        );
        let page = parser().parse(&html);
        assert_eq!(page.candidates().len(), 1);
        assert_eq!(page.candidates()[0].internal_id, "5");
    }

    #[test]
    fn test_short_names_are_rejected() {
        let html = r#"<table><tr><td><a href="details.php?id=1" title="x">y</a></td></tr></table>"#;
        assert_eq!(parser().parse(html), SearchPage::Empty);
    }
}
