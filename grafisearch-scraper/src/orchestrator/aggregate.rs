//! Concurrent multi-provider fan-out and merge.
//!
//! Queries every provider in `config.providers` concurrently, logs the ones
//! that fail, and merges the successful batches in provider order.

use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::providers::{DuckDuckGoEngine, GoogleEngine, YouTubeEngine};
use crate::types::{Provider, SearchResult};

use super::dedup::merge;

/// What one provider produced for a query.
#[derive(Debug)]
pub struct ProviderOutcome {
    pub provider: Provider,
    pub result: Result<Vec<SearchResult>, SearchError>,
}

/// A provider that failed during an aggregated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub error: String,
}

/// Merged records plus the providers that failed along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregated {
    pub results: Vec<SearchResult>,
    #[serde(rename = "errors")]
    pub failures: Vec<ProviderFailure>,
}

/// Run every configured provider concurrently.
///
/// Outcomes come back in the order of `config.providers`, whatever order
/// the requests finish in.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. Provider
/// failures are reported per outcome, not here.
pub async fn search_all(
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<ProviderOutcome>, SearchError> {
    config.validate()?;

    let futures: Vec<_> = config
        .providers
        .iter()
        .map(|&provider| async move {
            let result = query_provider(provider, query, config).await;
            ProviderOutcome { provider, result }
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(results) => {
                tracing::debug!(provider = %outcome.provider, count = results.len(), "provider returned results");
            }
            Err(err) => {
                tracing::warn!(provider = %outcome.provider, error = %err, "provider query failed");
            }
        }
    }

    Ok(outcomes)
}

/// Fold outcomes into merged records and a failure list.
///
/// # Errors
///
/// Returns [`SearchError::AllProvidersFailed`] when there is at least one
/// outcome and every one of them is an error. Empty successful batches
/// are not failures.
pub fn collect(outcomes: Vec<ProviderOutcome>) -> Result<Aggregated, SearchError> {
    let mut batches = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome.result {
            Ok(results) => batches.push(results),
            Err(err) => failures.push(ProviderFailure {
                provider: outcome.provider,
                error: err.to_string(),
            }),
        }
    }

    if batches.is_empty() && !failures.is_empty() {
        let summary: Vec<String> = failures
            .iter()
            .map(|f| format!("{}: {}", f.provider, f.error))
            .collect();
        return Err(SearchError::AllProvidersFailed(summary.join("; ")));
    }

    Ok(Aggregated {
        results: merge(batches),
        failures,
    })
}

/// Search all configured providers and merge their records.
///
/// Partial failures are kept in [`Aggregated::failures`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config and
/// [`SearchError::AllProvidersFailed`] if every provider failed.
pub async fn search(query: &str, config: &SearchConfig) -> Result<Aggregated, SearchError> {
    let outcomes = search_all(query, config).await?;
    collect(outcomes)
}

/// Query a single provider, dispatching to the concrete implementation.
pub async fn query_provider(
    provider: Provider,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    match provider {
        Provider::Google => GoogleEngine.search(query, config).await,
        Provider::DuckDuckGo => DuckDuckGoEngine.search(query, config).await,
        Provider::YouTube => YouTubeEngine.search(query, config).await,
    }
}
