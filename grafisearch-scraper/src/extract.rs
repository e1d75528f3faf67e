//! Selector-cascade support shared by the provider extractors.
//!
//! Each provider describes its markup strategies as a small enum of
//! [`Tier`]s. [`cascade`] tries them in order and stops at the first tier
//! that yields at least one record. A tier that matches nothing is a
//! selector miss, not an error.

use scraper::{ElementRef, Html, Selector};

use crate::blocklist::Blocklist;
use crate::error::SearchError;
use crate::types::SearchResult;

/// One selector-based extraction strategy.
pub trait Tier {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract records from `document`.
    ///
    /// Each call runs its own accept pass, so dedup state never leaks
    /// between tiers or between calls.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] only if one of the tier's selectors
    /// fails to compile.
    fn extract(
        &self,
        document: &Html,
        blocklist: &Blocklist,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

/// Run `tiers` in order, returning the first non-empty result set.
///
/// Later tiers are never attempted once one tier yields a record. If every
/// tier comes up empty the result is an empty list.
///
/// # Errors
///
/// Propagates the first selector compilation error.
pub fn cascade<T: Tier>(
    tiers: &[T],
    document: &Html,
    blocklist: &Blocklist,
) -> Result<Vec<SearchResult>, SearchError> {
    for tier in tiers {
        let results = tier.extract(document, blocklist)?;
        if !results.is_empty() {
            tracing::debug!(tier = tier.name(), count = results.len(), "tier matched");
            return Ok(results);
        }
        tracing::debug!(tier = tier.name(), "tier matched nothing");
    }
    Ok(Vec::new())
}

/// Compile a CSS selector, mapping failure to [`SearchError::Parse`].
pub fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Compile an ordered list of selectors.
pub fn selectors(list: &[&str]) -> Result<Vec<Selector>, SearchError> {
    list.iter().map(|css| selector(css)).collect()
}

/// All descendant text of `element`, trimmed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Trimmed text of the first element under `scope` matching `sel`, or empty.
pub fn first_text(scope: ElementRef<'_>, sel: &Selector) -> String {
    scope.select(sel).next().map(text_of).unwrap_or_default()
}

/// The first non-empty text among `sels`, tried in order.
pub fn first_nonempty_text(scope: ElementRef<'_>, sels: &[Selector]) -> String {
    sels.iter()
        .flat_map(|sel| scope.select(sel))
        .map(text_of)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// The nearest ancestor of `element` matching `sel`.
pub fn closest<'a>(element: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| sel.matches(ancestor))
}

/// The parent element of `element`, if it has one.
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}
