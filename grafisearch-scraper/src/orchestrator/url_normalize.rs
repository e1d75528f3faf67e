//! Comparison keys for merging results across providers.
//!
//! Two providers rarely link a page identically: one adds `www.`, another
//! a trailing slash or a tracking parameter. [`normalize_url`] maps such
//! variants onto one key. The key is only used for comparison; records
//! keep their original canonical URL.

use url::Url;

/// Query parameters that never change the page being pointed at.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "sa",
    "ved",
    "usg",
    "rut",
    "si",
    "feature",
];

/// Comparison key for `raw`.
///
/// The host is lowercased with any leading `www.` removed, default ports,
/// fragments and tracking parameters are dropped, the remaining query
/// pairs are sorted and a trailing slash is removed from non-root paths.
/// Unparseable input is its own key.
///
/// # Examples
///
/// ```
/// use grafisearch_scraper::orchestrator::url_normalize::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://www.Example.com/page/?b=2&a=1#top"),
///     normalize_url("https://example.com/page?a=1&b=2&utm_source=x"),
/// );
/// ```
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return raw.to_owned();
    };

    // Url::parse already drops a port equal to the scheme default.
    parsed.set_fragment(None);

    let bare_host = parsed
        .host_str()
        .and_then(|h| h.strip_prefix("www."))
        .map(str::to_owned);
    if let Some(bare) = bare_host {
        let _ = parsed.set_host(Some(&bare));
    }

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_ascii_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    let path = parsed.path().to_owned();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.into()
}
