//! Concrete provider implementations.

pub mod duckduckgo;
pub mod google;
pub mod youtube;

pub use duckduckgo::{parse_duckduckgo_html, DuckDuckGoEngine};
pub use google::{parse_google_html, GoogleEngine};
pub use youtube::{parse_youtube_html, YouTubeEngine};
