//! Redirect-wrapper unwrapping for result links.
//!
//! Providers often point result anchors at their own redirect endpoint
//! (`/url?q=https://…&sa=U`, `//duckduckgo.com/l/?uddg=…`) instead of the
//! destination. [`canonicalize`] turns such a wrapper back into the real
//! destination URL. It never fails: malformed input degrades to a
//! best-effort textual cleanup.

use url::Url;

/// Maximum number of nested wrappers unwrapped by one call.
const MAX_UNWRAP_DEPTH: usize = 5;

/// Description of one provider's redirect-wrapper form.
#[derive(Debug, Clone, Copy)]
pub struct RedirectWrapper {
    /// Base used to resolve relative or protocol-relative wrappers.
    pub base: &'static str,
    /// Prefixes that identify a wrapper.
    pub prefixes: &'static [&'static str],
    /// Query keys holding the destination, in precedence order.
    pub keys: &'static [&'static str],
    /// Prefixes stripped by the textual fallback.
    pub strip_prefixes: &'static [&'static str],
}

/// Google's `/url?q=` result wrapper.
pub const GOOGLE_REDIRECT: RedirectWrapper = RedirectWrapper {
    base: "https://www.google.com",
    prefixes: &["/url?"],
    keys: &["q", "url"],
    strip_prefixes: &["/url?q=", "/url?url="],
};

/// DuckDuckGo's `/l/?uddg=` result wrapper.
pub const DUCKDUCKGO_REDIRECT: RedirectWrapper = RedirectWrapper {
    base: "https://duckduckgo.com",
    prefixes: &["//duckduckgo.com/l/?", "https://duckduckgo.com/l/?", "/l/?"],
    keys: &["uddg"],
    strip_prefixes: &[
        "//duckduckgo.com/l/?uddg=",
        "https://duckduckgo.com/l/?uddg=",
        "/l/?uddg=",
    ],
};

impl RedirectWrapper {
    /// Whether `href` is in this wrapper's form.
    pub fn matches(&self, href: &str) -> bool {
        self.prefixes.iter().any(|p| href.starts_with(p))
    }

    /// Read the destination from the wrapper's query string.
    ///
    /// Returns `None` if the href cannot be parsed or no key holds a
    /// non-empty value.
    fn query_destination(&self, href: &str) -> Option<String> {
        let base = Url::parse(self.base).ok()?;
        let parsed = base.join(href).ok()?;
        self.keys.iter().find_map(|key| {
            parsed
                .query_pairs()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.into_owned())
        })
    }

    /// Textual fallback: drop trailing parameters, strip a known prefix,
    /// then percent-decode. A decoding failure keeps the undecoded text.
    fn text_destination(&self, href: &str) -> String {
        let head = href.split('&').next().unwrap_or_default();
        let stripped = self
            .strip_prefixes
            .iter()
            .find_map(|p| head.strip_prefix(p))
            .unwrap_or(head);
        match urlencoding::decode(stripped) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => stripped.to_owned(),
        }
    }
}

/// Unwrap a Google result link. Non-wrapper input is returned unchanged.
///
/// # Examples
///
/// ```
/// use grafisearch_scraper::canonicalize::canonicalize;
///
/// assert_eq!(
///     canonicalize("/url?q=https://example.com/page&sa=U"),
///     "https://example.com/page"
/// );
/// assert_eq!(canonicalize("https://example.com/"), "https://example.com/");
/// ```
pub fn canonicalize(raw_href: &str) -> String {
    canonicalize_with(&GOOGLE_REDIRECT, raw_href)
}

/// Unwrap `raw_href` according to `wrapper`.
///
/// A destination that is itself a wrapper is unwrapped again, up to
/// [`MAX_UNWRAP_DEPTH`] levels, so the output is stable under a second call.
pub fn canonicalize_with(wrapper: &RedirectWrapper, raw_href: &str) -> String {
    let mut href = raw_href.trim().to_owned();
    for _ in 0..MAX_UNWRAP_DEPTH {
        if !wrapper.matches(&href) {
            return href;
        }
        let next = match wrapper.query_destination(&href) {
            Some(url) => url,
            None => wrapper.text_destination(&href),
        };
        let next = next.trim();
        if next == href {
            return href;
        }
        href = next.to_owned();
    }
    href
}
