//! Google web search: best results but aggressive bot detection.
//!
//! Requests carry a randomized Lynx User-Agent and consent cookies so
//! Google answers with its plain HTML layout. The markup changes often,
//! so extraction walks three tiers: the modern result containers, the
//! older text-browser layout, and finally a bare scan of outbound links.

use scraper::Html;

use crate::assemble::{Assembler, Candidate};
use crate::blocklist::Blocklist;
use crate::canonicalize::canonicalize;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::extract::{
    cascade, closest, first_nonempty_text, first_text, selector, selectors, text_of, Tier,
};
use crate::http;
use crate::provider::{escape_query, SearchProvider};
use crate::types::{Provider, SearchResult};

/// Modern result containers, unioned.
const PRIMARY_CONTAINERS: &str = "div.g, div.tF2Cxc, div.MjjYud, div[data-sokoban-container]";

/// Knowledge panels and expanded snippets, not organic results. A
/// container is skipped if it, an ancestor or a descendant matches.
const SPECIAL_RESULTS: &str = ".kp-wholepage, .xpdopen, .kno-kp, .ULSxyf";

/// Description selectors, tried in order.
const PRIMARY_DESCRIPTIONS: &[&str] = &[
    ".VwiC3b",
    ".IsZvec",
    "[data-sncf]",
    ".lEBKkf",
    "span.aCOpRe",
];

const HEADINGS: &str = "h3, h2, [role='heading']";

/// Result blocks of the text-browser layout.
const LEGACY_CONTAINERS: &str = "div.ezO2md, div.Gx5Zad.xpd";
const LEGACY_TITLES: &[&str] = &[".CVA68e", ".vvjwJb", "h3"];
const LEGACY_DESCRIPTIONS: &[&str] = &[".FrIlee", ".s3v9rd"];
const LEGACY_BREADCRUMBS: &[&str] = &[".fYyStc", ".UPmit"];
const BREADCRUMB_SEPARATOR: &str = " › ";

/// Maximum records emitted by the link scan.
pub const LAST_RESORT_LIMIT: usize = 10;
/// Inclusive bounds, in characters, on link text accepted by the link scan.
pub const LAST_RESORT_TEXT_LEN: (usize, usize) = (10, 200);

/// Google HTML search scraper.
pub struct GoogleEngine;

impl GoogleEngine {
    /// Result page URL for `query`.
    pub fn search_url(query: &str) -> String {
        format!("https://www.google.com/search?q={}", escape_query(query))
    }
}

impl SearchProvider for GoogleEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Google search");

        let client = http::build_client(config)?;
        let page = http::fetch(&client, Provider::Google, &Self::search_url(query), config).await?;

        parse_google_html(&page.body, &config.blocklist())
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }
}

/// Google's extraction strategies, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoogleTier {
    /// Modern containers with heading-in-link titles.
    Primary,
    /// Text-browser layout with breadcrumb site names.
    Legacy,
    /// Any outbound link with plausible title-length text.
    LastResort,
}

/// All tiers in the order they are attempted.
pub const GOOGLE_TIERS: [GoogleTier; 3] =
    [GoogleTier::Primary, GoogleTier::Legacy, GoogleTier::LastResort];

impl Tier for GoogleTier {
    fn name(&self) -> &'static str {
        match self {
            Self::Primary => "google/primary",
            Self::Legacy => "google/legacy",
            Self::LastResort => "google/last-resort",
        }
    }

    fn extract(
        &self,
        document: &Html,
        blocklist: &Blocklist,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            Self::Primary => extract_primary(document, blocklist),
            Self::Legacy => extract_legacy(document, blocklist),
            Self::LastResort => extract_last_resort(document, blocklist),
        }
    }
}

/// Parse a Google result page.
///
/// Extracted as a separate function for testability with fixture HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] only if a selector fails to compile.
pub fn parse_google_html(
    html: &str,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let results = cascade(&GOOGLE_TIERS, &document, blocklist)?;
    tracing::debug!(count = results.len(), "Google results parsed");
    Ok(results)
}

fn extract_primary(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let container_sel = selector(PRIMARY_CONTAINERS)?;
    let link_sel = selector("a[href]")?;
    let heading_sel = selector(HEADINGS)?;
    let desc_sels = selectors(PRIMARY_DESCRIPTIONS)?;
    let special_sel = selector(SPECIAL_RESULTS)?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for container in document.select(&container_sel) {
        if special_sel.matches(&container)
            || closest(container, &special_sel).is_some()
            || container.select(&special_sel).next().is_some()
        {
            continue;
        }
        let Some(link) = container.select(&link_sel).next() else {
            continue;
        };

        let url = canonicalize(link.value().attr("href").unwrap_or_default());
        let title = match first_text(link, &heading_sel) {
            t if t.is_empty() => first_text(container, &heading_sel),
            t => t,
        };
        let desc = first_nonempty_text(container, &desc_sels);

        if let Some(result) = assembler.accept(Candidate {
            url,
            title,
            desc,
            ..Default::default()
        }) {
            results.push(result);
        }
    }
    Ok(results)
}

fn extract_legacy(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let container_sel = selector(LEGACY_CONTAINERS)?;
    let link_sel = selector("a[href]")?;
    let title_sels = selectors(LEGACY_TITLES)?;
    let desc_sels = selectors(LEGACY_DESCRIPTIONS)?;
    let crumb_sels = selectors(LEGACY_BREADCRUMBS)?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for container in document.select(&container_sel) {
        let Some(link) = container.select(&link_sel).next() else {
            continue;
        };
        let url = canonicalize(link.value().attr("href").unwrap_or_default());
        let title = match first_nonempty_text(container, &title_sels) {
            t if t.is_empty() => text_of(link),
            t => t,
        };
        let desc = first_nonempty_text(container, &desc_sels);
        let (site_name, author) = split_breadcrumb(&first_nonempty_text(container, &crumb_sels));

        if let Some(result) = assembler.accept(Candidate {
            url,
            title,
            desc,
            site_name,
            author,
        }) {
            results.push(result);
        }
    }
    Ok(results)
}

fn extract_last_resort(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let link_sel = selector("a[href]")?;
    let (min_len, max_len) = LAST_RESORT_TEXT_LEN;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for link in document.select(&link_sel) {
        let title = text_of(link);
        let len = title.chars().count();
        if len < min_len || len > max_len {
            continue;
        }
        let url = canonicalize(link.value().attr("href").unwrap_or_default());
        if !is_outbound(&url) {
            continue;
        }
        if let Some(result) = assembler.accept(Candidate {
            url,
            title,
            ..Default::default()
        }) {
            results.push(result);
            if results.len() >= LAST_RESORT_LIMIT {
                break;
            }
        }
    }
    Ok(results)
}

/// Split a `www.site.fr › section › leaf` breadcrumb into a site name
/// (the whole breadcrumb, `www.` removed) and an author (last segment).
fn split_breadcrumb(crumb: &str) -> (String, String) {
    let site_name = crumb.replace("www.", "").trim().to_owned();
    let author = site_name
        .split(BREADCRUMB_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .last()
        .unwrap_or_default()
        .to_owned();
    (site_name, author)
}

/// An http(s) link leaving Google's own properties.
fn is_outbound(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    match crate::assemble::host_of(url) {
        Some(host) => !host.split('.').any(|label| label.eq_ignore_ascii_case("google")),
        None => false,
    }
}
