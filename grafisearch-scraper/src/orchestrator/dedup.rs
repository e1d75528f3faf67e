//! Cross-provider result merging.
//!
//! Each provider already deduplicates its own batch by exact URL. When
//! several providers are queried, the same page can still appear in two
//! batches under slightly different URLs. [`merge`] folds the batches into
//! one list keyed by [`normalize_url`], keeping the first occurrence.

use std::collections::HashSet;

use crate::types::SearchResult;

use super::url_normalize::normalize_url;

/// Merge per-provider batches into a single list.
///
/// Batches are concatenated in the order given, which is the requested
/// provider order. A record whose normalized URL was already emitted is
/// dropped, so the earlier provider's record wins and keeps its position.
pub fn merge(batches: Vec<Vec<SearchResult>>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(batches.iter().map(Vec::len).sum());

    for result in batches.into_iter().flatten() {
        if seen.insert(normalize_url(&result.url)) {
            merged.push(result);
        }
    }

    merged
}
