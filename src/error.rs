//! Error types for the grafisearch application.

use grafisearch_scraper::SearchError;

/// Top-level error type for the application around the search core.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset manifest could not be read or parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// HTTP server error (bind, address lookup).
    #[error("server error: {0}")]
    Server(String),

    /// Search failure bubbled up from the core.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_error_is_transparent() {
        let err: AppError = SearchError::AllProvidersFailed("Google: boom".into()).into();
        assert_eq!(err.to_string(), "all providers failed: Google: boom");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
