//! DuckDuckGo web search, the secondary and scraper-friendly provider.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript. Result links go through DuckDuckGo's
//! `/l/?uddg=` redirect and are unwrapped before dedup.

use scraper::{ElementRef, Html};

use crate::assemble::{site_name_from_host, Assembler, Candidate};
use crate::blocklist::Blocklist;
use crate::canonicalize::{canonicalize_with, DUCKDUCKGO_REDIRECT};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::extract::{cascade, closest, first_text, selector, text_of, Tier};
use crate::http;
use crate::provider::{escape_query, SearchProvider};
use crate::types::{Provider, SearchResult};

/// DuckDuckGo HTML search scraper.
pub struct DuckDuckGoEngine;

impl DuckDuckGoEngine {
    /// Result page URL for `query`.
    pub fn search_url(query: &str) -> String {
        format!("https://html.duckduckgo.com/html/?q={}", escape_query(query))
    }
}

impl SearchProvider for DuckDuckGoEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let client = http::build_client(config)?;
        let page =
            http::fetch(&client, Provider::DuckDuckGo, &Self::search_url(query), config).await?;

        parse_duckduckgo_html(&page.body, &config.blocklist())
    }

    fn provider(&self) -> Provider {
        Provider::DuckDuckGo
    }
}

/// DuckDuckGo's extraction strategies, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckDuckGoTier {
    /// `.result` blocks of the HTML endpoint, ads excluded.
    Results,
    /// Table rows of the lite layout.
    Lite,
}

/// All tiers in the order they are attempted.
pub const DUCKDUCKGO_TIERS: [DuckDuckGoTier; 2] = [DuckDuckGoTier::Results, DuckDuckGoTier::Lite];

impl Tier for DuckDuckGoTier {
    fn name(&self) -> &'static str {
        match self {
            Self::Results => "duckduckgo/results",
            Self::Lite => "duckduckgo/lite",
        }
    }

    fn extract(
        &self,
        document: &Html,
        blocklist: &Blocklist,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            Self::Results => extract_results(document, blocklist),
            Self::Lite => extract_lite(document, blocklist),
        }
    }
}

/// Parse a DuckDuckGo result page.
///
/// Extracted as a separate function for testability with fixture HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] only if a selector fails to compile.
pub fn parse_duckduckgo_html(
    html: &str,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let results = cascade(&DUCKDUCKGO_TIERS, &document, blocklist)?;
    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

fn extract_results(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let result_sel = selector(".result.results_links:not(.result--ad), .web-result:not(.result--ad)")?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;
    let site_sel = selector(".result__url")?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let href = title_el.value().attr("href").unwrap_or_default();

        if let Some(result) = assembler.accept(Candidate {
            url: canonicalize_with(&DUCKDUCKGO_REDIRECT, href),
            title: text_of(title_el),
            desc: first_text(element, &snippet_sel),
            site_name: site_name_from_host(&first_text(element, &site_sel)),
            author: String::new(),
        }) {
            results.push(result);
        }
    }
    Ok(results)
}

fn extract_lite(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let link_sel = selector("a.result-link")?;
    let row_sel = selector("tr")?;
    let snippet_sel = selector("td.result-snippet")?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for link in document.select(&link_sel) {
        let href = link.value().attr("href").unwrap_or_default();
        let desc = closest(link, &row_sel)
            .map(|row| following_snippet(row, &link_sel, &snippet_sel))
            .unwrap_or_default();

        if let Some(result) = assembler.accept(Candidate {
            url: canonicalize_with(&DUCKDUCKGO_REDIRECT, href),
            title: text_of(link),
            desc,
            ..Default::default()
        }) {
            results.push(result);
        }
    }
    Ok(results)
}

/// Snippet text from the rows following `row`, stopping at the next result.
fn following_snippet(
    row: ElementRef<'_>,
    link_sel: &scraper::Selector,
    snippet_sel: &scraper::Selector,
) -> String {
    for sibling in row.next_siblings().filter_map(ElementRef::wrap) {
        if sibling.select(link_sel).next().is_some() {
            break;
        }
        let snippet = first_text(sibling, snippet_sel);
        if !snippet.is_empty() {
            return snippet;
        }
    }
    String::new()
}
