//! YouTube video search.
//!
//! Result items are `ytd-*-renderer` elements. When none of them are
//! present the page is scanned for bare `/watch` links instead.

use scraper::{ElementRef, Html, Selector};

use crate::assemble::{join_nonempty, Assembler, Candidate};
use crate::blocklist::Blocklist;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::extract::{
    cascade, closest, first_nonempty_text, parent_element, selector, selectors, text_of, Tier,
};
use crate::http;
use crate::provider::{escape_query, SearchProvider};
use crate::types::{Provider, SearchResult};

/// Origin prefixed onto relative video links.
pub const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";
/// Site label of every YouTube record.
pub const YOUTUBE_SITE_NAME: &str = "YouTube";

const ITEMS: &str =
    "ytd-video-renderer, ytd-rich-item-renderer, .ytd-video-renderer, .ytd-rich-item-renderer";
const LINKS: &str = "a#video-title, a.yt-simple-endpoint";
const ALT_TITLES: &[&str] = &["#video-title", "h3.title"];
const CHANNELS: &[&str] = &["#channel-name", ".ytd-channel-name"];
const DURATIONS: &[&str] = &[
    "#text.ytd-thumbnail-overlay-time-status-renderer",
    ".ytd-thumbnail-overlay-time-status-renderer #text",
];
const META_SPANS: &str = "#metadata-line span, .ytd-video-meta-block span";
const SNIPPETS: &[&str] = &["#description-text", ".metadata-snippet-container"];

const WATCH_LINKS: &str = "a[href^='/watch']";
const WATCH_CONTAINERS: &str = ".video-list-item, .yt-lockup, .ytd-video-renderer";
const WATCH_TITLES: &[&str] = &[".title", ".video-title", "h3"];

/// YouTube HTML search scraper.
pub struct YouTubeEngine;

impl YouTubeEngine {
    /// Result page URL for `query`.
    pub fn search_url(query: &str) -> String {
        format!("{YOUTUBE_ORIGIN}/results?search_query={}", escape_query(query))
    }
}

impl SearchProvider for YouTubeEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "YouTube search");

        let client = http::build_client(config)?;
        let page = http::fetch(&client, Provider::YouTube, &Self::search_url(query), config).await?;

        parse_youtube_html(&page.body, &config.blocklist())
    }

    fn provider(&self) -> Provider {
        Provider::YouTube
    }
}

/// YouTube's extraction strategies, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YouTubeTier {
    /// Structured renderer elements with channel, views and duration.
    Renderers,
    /// Any relative `/watch` link.
    WatchLinks,
}

/// All tiers in the order they are attempted.
pub const YOUTUBE_TIERS: [YouTubeTier; 2] = [YouTubeTier::Renderers, YouTubeTier::WatchLinks];

impl Tier for YouTubeTier {
    fn name(&self) -> &'static str {
        match self {
            Self::Renderers => "youtube/renderers",
            Self::WatchLinks => "youtube/watch-links",
        }
    }

    fn extract(
        &self,
        document: &Html,
        blocklist: &Blocklist,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            Self::Renderers => extract_renderers(document, blocklist),
            Self::WatchLinks => extract_watch_links(document, blocklist),
        }
    }
}

/// Parse a YouTube result page.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] only if a selector fails to compile.
pub fn parse_youtube_html(
    html: &str,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let results = cascade(&YOUTUBE_TIERS, &document, blocklist)?;
    tracing::debug!(count = results.len(), "YouTube results parsed");
    Ok(results)
}

/// Absolute video URL for `href`, or empty if it is neither absolute nor
/// a site-relative watch path.
fn video_url(href: &str) -> String {
    if href.starts_with("/watch") {
        format!("{YOUTUBE_ORIGIN}{href}")
    } else if href.starts_with("http") {
        href.to_owned()
    } else {
        String::new()
    }
}

fn extract_renderers(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let item_sel = selector(ITEMS)?;
    let link_sel = selector(LINKS)?;
    let alt_title_sels = selectors(ALT_TITLES)?;
    let channel_sels = selectors(CHANNELS)?;
    let duration_sels = selectors(DURATIONS)?;
    let meta_sel = selector(META_SPANS)?;
    let snippet_sels = selectors(SNIPPETS)?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for item in document.select(&item_sel) {
        let (url, mut title) = match item.select(&link_sel).next() {
            Some(a) => (video_url(a.value().attr("href").unwrap_or_default()), text_of(a)),
            None => (String::new(), String::new()),
        };
        if title.is_empty() {
            title = first_nonempty_text(item, &alt_title_sels);
        }

        let channel = first_nonempty_text(item, &channel_sels);
        let duration = first_nonempty_text(item, &duration_sels);
        let views = view_count(item, &meta_sel);
        let snippet = first_nonempty_text(item, &snippet_sels);

        if let Some(result) = assembler.accept(Candidate {
            url,
            title,
            desc: join_nonempty([
                snippet.as_str(),
                channel.as_str(),
                views.as_str(),
                duration.as_str(),
            ]),
            site_name: YOUTUBE_SITE_NAME.to_owned(),
            author: channel,
        }) {
            results.push(result);
        }
    }
    Ok(results)
}

/// The metadata span mentioning views, e.g. `1.2M views`.
fn view_count(item: ElementRef<'_>, meta_sel: &Selector) -> String {
    item.select(meta_sel)
        .map(text_of)
        .find(|text| text.contains("views"))
        .unwrap_or_default()
}

fn extract_watch_links(
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    let link_sel = selector(WATCH_LINKS)?;
    let container_sel = selector(WATCH_CONTAINERS)?;
    let title_sels = selectors(WATCH_TITLES)?;

    let mut assembler = Assembler::new(blocklist);
    let mut results = Vec::new();

    for link in document.select(&link_sel) {
        let url = video_url(link.value().attr("href").unwrap_or_default());
        if url.is_empty() || assembler.has_seen(&url) {
            continue;
        }

        let mut title = text_of(link);
        if title.is_empty() {
            let container = closest(link, &container_sel).or_else(|| parent_element(link));
            if let Some(container) = container {
                title = first_nonempty_text(container, &title_sels);
            }
        }

        if let Some(result) = assembler.accept(Candidate {
            url,
            title,
            site_name: YOUTUBE_SITE_NAME.to_owned(),
            ..Default::default()
        }) {
            results.push(result);
        }
    }
    Ok(results)
}
