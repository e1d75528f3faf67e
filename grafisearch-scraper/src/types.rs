//! Core types for search results and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single record extracted from a provider's result page.
///
/// Records are built once by the result assembler and never mutated
/// afterwards. All string fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Canonical absolute destination URL.
    pub url: String,
    /// Heading text. Only the last-resort Google tier may leave it short.
    pub title: String,
    /// Snippet, possibly a composite of several sub-fields.
    pub desc: String,
    /// Host component of `url`.
    pub domain: String,
    /// Display label for the site, `domain` without a leading `www.`
    /// unless the provider supplied a breadcrumb.
    pub site_name: String,
    /// Optional attribution such as a channel name or breadcrumb leaf.
    pub author: String,
}

/// Search providers whose public result pages can be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Generic web search with the strictest bot detection.
    Google,
    /// Secondary web search via the HTML-only endpoint.
    DuckDuckGo,
    /// Video search.
    YouTube,
}

impl Provider {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::YouTube => "YouTube",
        }
    }

    /// Whether this provider needs the randomized text-browser User-Agent
    /// and consent cookies to return plain HTML results.
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Google)
    }

    /// Returns all available providers, in default aggregation order.
    pub fn all() -> &'static [Provider] {
        &[Self::Google, Self::DuckDuckGo, Self::YouTube]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            "youtube" | "yt" => Ok(Self::YouTube),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}
