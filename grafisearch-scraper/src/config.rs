//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are queried, the transport
//! deadline, request headers and the host deny-list.

use serde::{Deserialize, Serialize};

use crate::blocklist::{Blocklist, DEFAULT_BLOCKLIST};
use crate::error::SearchError;
use crate::types::Provider;

/// Default `accept-language` header sent to every provider.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "fr,fr-FR;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6";

/// Configuration for a search operation.
///
/// Every field has a default, so a partial `[search]` TOML table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which providers to query. Queried concurrently; results are merged
    /// in this order.
    pub providers: Vec<Provider>,
    /// Per-request HTTP deadline in seconds, enforced by the transport.
    pub timeout_seconds: u64,
    /// Value of the `accept-language` request header.
    pub accept_language: String,
    /// Custom User-Agent for non-strict providers. The strict provider
    /// always receives a randomized text-browser User-Agent.
    pub user_agent: Option<String>,
    /// Hosts excluded from results. Subdomains of an entry are excluded too.
    pub blocklist: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: Provider::all().to_vec(),
            timeout_seconds: 8,
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
            user_agent: None,
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `providers` must not be empty
    /// - `blocklist` entries must not be blank
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.providers.is_empty() {
            return Err(SearchError::Config(
                "at least one provider must be enabled".into(),
            ));
        }
        if self.blocklist.iter().any(|h| h.trim().is_empty()) {
            return Err(SearchError::Config(
                "blocklist entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Build the normalized deny-list used by the result assembler.
    pub fn blocklist(&self) -> Blocklist {
        Blocklist::new(&self.blocklist)
    }
}
