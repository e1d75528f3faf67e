//! # grafisearch-scraper
//!
//! Search result extraction from public provider HTML pages.
//!
//! This crate fetches the result page of a search provider (Google,
//! DuckDuckGo or YouTube), extracts a normalized list of
//! [`SearchResult`] records from it, and can merge several providers'
//! records into one list. No API keys are involved: everything works off
//! the same HTML a browser would get.
//!
//! ## Design
//!
//! - One GET per provider, with provider-specific headers (a randomized
//!   text-browser User-Agent and consent cookies for Google)
//! - Each provider parses its page through an ordered cascade of selector
//!   tiers and stops at the first one that yields anything
//! - Provider redirect links (`/url?q=`, `/l/?uddg=`) are unwrapped to the
//!   real destination
//! - Records are deduplicated per provider by exact URL, and across
//!   providers by a normalized comparison key
//! - Graceful degradation: if some providers fail, the others still
//!   return results
//!
//! ## Security
//!
//! - Search queries are logged only at trace level
//! - Hosts on the configured deny-list never appear in results

pub mod assemble;
pub mod blocklist;
pub mod canonicalize;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod types;

pub use blocklist::Blocklist;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::aggregate::{Aggregated, ProviderFailure, ProviderOutcome};
pub use provider::SearchProvider;
pub use types::{Provider, SearchResult};

/// Search every provider in `config` concurrently and merge the results.
///
/// Records keep their provider's order, providers follow the order of
/// `config.providers`, and a page returned by several providers is kept
/// only once (first provider wins). Providers that failed are listed in
/// [`Aggregated::failures`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid and
/// [`SearchError::AllProvidersFailed`] if every provider fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> grafisearch_scraper::Result<()> {
/// let config = grafisearch_scraper::SearchConfig::default();
/// let aggregated = grafisearch_scraper::search("rust programming", &config).await?;
/// for result in &aggregated.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Aggregated> {
    orchestrator::aggregate::search(query, config).await
}

/// Search a single provider.
///
/// Unlike [`search`], the provider's error is returned as is.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, otherwise
/// whatever the provider returned.
pub async fn search_provider(
    provider: Provider,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>> {
    config.validate()?;
    orchestrator::aggregate::query_provider(provider, query, config).await
}

/// Google web search with default configuration.
///
/// # Errors
///
/// Same as [`search_provider`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> grafisearch_scraper::Result<()> {
/// let results = grafisearch_scraper::search_google("grafikart").await?;
/// println!("{} results", results.len());
/// # Ok(())
/// # }
/// ```
pub async fn search_google(query: &str) -> Result<Vec<SearchResult>> {
    search_provider(Provider::Google, query, &SearchConfig::default()).await
}

/// DuckDuckGo web search with default configuration.
///
/// # Errors
///
/// Same as [`search_provider`].
pub async fn search_duckduckgo(query: &str) -> Result<Vec<SearchResult>> {
    search_provider(Provider::DuckDuckGo, query, &SearchConfig::default()).await
}

/// YouTube video search with default configuration.
///
/// # Errors
///
/// Same as [`search_provider`].
pub async fn search_youtube(query: &str) -> Result<Vec<SearchResult>> {
    search_provider(Provider::YouTube, query, &SearchConfig::default()).await
}
