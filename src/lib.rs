//! Grafisearch: multi-provider web and video search over scraped result pages.
//!
//! The extraction core lives in the `grafisearch-scraper` crate. This
//! crate wraps it into an application:
//! - **Config**: one TOML file with `[search]` and `[server]` tables
//! - **Assets**: Vite manifest lookup for the page head
//! - **Server**: axum routes for the HTML shell, the JSON API and assets

pub mod assets;
pub mod config;
pub mod error;
pub mod server;

pub use assets::ViteAssets;
pub use config::{AppConfig, ServerConfig};
pub use error::{AppError, Result};
pub use server::Server;
