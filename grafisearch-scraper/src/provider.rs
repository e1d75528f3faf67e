//! Trait definition for pluggable search providers.
//!
//! Each provider (Google, DuckDuckGo, YouTube) implements
//! [`SearchProvider`] to provide a uniform interface for querying and
//! parsing results.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Provider, SearchResult};

/// A pluggable search provider backend.
///
/// Implementors fetch one result page and extract structured
/// [`SearchResult`] values from it. Each provider handles its own:
///
/// - URL construction with query escaping
/// - HTML parsing via an ordered cascade of selector tiers
/// - Redirect unwrapping for its result links
///
/// A call is self-contained: it performs exactly one fetch, keeps its
/// dedup state local, and never retries. All implementations must be
/// `Send + Sync` so the aggregator can query providers concurrently.
pub trait SearchProvider: Send + Sync {
    /// Perform a search and return records in provider order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] if the page cannot be fetched and
    /// [`SearchError::Parse`] if it cannot be decoded. Missing markup is not
    /// an error: it yields an empty list.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Returns which [`Provider`] variant this implementation represents.
    fn provider(&self) -> Provider;
}

/// Escape `query` for embedding in a provider URL (spaces become `+`).
pub fn escape_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}
