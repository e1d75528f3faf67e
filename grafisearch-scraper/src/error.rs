//! Error types for the grafisearch-scraper crate.
//!
//! Only stream-level failures are errors. Missing markup, empty fields and
//! malformed result URLs are absorbed by the extractors and never surface
//! here.

/// Errors that can occur while querying a search provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The connection failed or the provider answered with a non-200 status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded or turned into a queryable tree.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Every requested provider failed.
    #[error("all providers failed: {0}")]
    AllProvidersFailed(String),
}

/// Convenience type alias for grafisearch-scraper results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_transport() {
        let err = SearchError::Transport("status 503 Service Unavailable".into());
        assert_eq!(
            err.to_string(),
            "transport error: status 503 Service Unavailable"
        );
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("invalid selector".into());
        assert_eq!(err.to_string(), "parse error: invalid selector");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("timeout_seconds must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: timeout_seconds must be greater than 0"
        );
    }

    #[test]
    fn display_all_providers_failed() {
        let err = SearchError::AllProvidersFailed("Google: boom".into());
        assert_eq!(err.to_string(), "all providers failed: Google: boom");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
