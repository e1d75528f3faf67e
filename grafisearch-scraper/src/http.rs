//! Shared HTTP transport for provider result pages.
//!
//! Every request carries browser-like `accept`, `accept-language` and
//! `cache-control` headers. The strict provider gets a freshly randomized
//! Lynx User-Agent and consent cookies so that it serves its plain HTML
//! layout; the others get a fixed desktop User-Agent.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::Provider;

/// `accept` header mimicking a desktop browser navigation.
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

/// User-Agent sent to every non-strict provider.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/99.0.4844.74 Safari/537.36";

/// Cookies that skip the consent interstitial of the strict provider.
pub const CONSENT_COOKIES: &str = "CONSENT=PENDING+987; SOCS=CAESHAgBEhIaAB";

/// A successfully fetched provider page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status (always 200).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body decoded to text using the charset from `Content-Type`.
    pub body: String,
}

/// Build a [`reqwest::Client`] configured for provider scraping.
///
/// The client has:
/// - Timeout from config (the only deadline in the pipeline)
/// - Brotli and gzip decompression
/// - Automatic redirect following, capped at 10 hops
///
/// # Errors
///
/// Returns [`SearchError::Transport`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Synthesize a Lynx User-Agent from independently drawn version numbers.
///
/// The caller owns the random source, so a seeded RNG gives a
/// deterministic string.
pub fn lynx_user_agent<R: Rng>(rng: &mut R) -> String {
    let lynx = format!(
        "Lynx/{}.{}.{}",
        rng.gen_range(2..=3),
        rng.gen_range(8..=9),
        rng.gen_range(0..=2)
    );
    let libwww = format!(
        "libwww-FM/{}.{}",
        rng.gen_range(2..=3),
        rng.gen_range(13..=15)
    );
    let ssl_mm = format!("SSL-MM/{}.{}", rng.gen_range(1..=2), rng.gen_range(3..=5));
    let openssl = format!(
        "OpenSSL/{}.{}.{}",
        rng.gen_range(1..=3),
        rng.gen_range(0..=4),
        rng.gen_range(0..=9)
    );
    format!("{lynx} {libwww} {ssl_mm} {openssl}")
}

/// Headers for one request to `provider`.
///
/// # Errors
///
/// Returns [`SearchError::Transport`] if a configured value is not a
/// valid header value.
pub fn request_headers(
    provider: Provider,
    config: &SearchConfig,
) -> Result<HeaderMap, SearchError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header_value(&config.accept_language)?,
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    if provider.is_strict() {
        let ua = lynx_user_agent(&mut rand::thread_rng());
        headers.insert(header::USER_AGENT, header_value(&ua)?);
        headers.insert(header::COOKIE, HeaderValue::from_static(CONSENT_COOKIES));
    } else {
        let ua = config.user_agent.as_deref().unwrap_or(DESKTOP_USER_AGENT);
        headers.insert(header::USER_AGENT, header_value(ua)?);
    }
    Ok(headers)
}

/// Issue a single GET for `url` on behalf of `provider`.
///
/// The response is consumed inside this function, so the connection is
/// released on every exit path.
///
/// # Errors
///
/// - [`SearchError::Transport`] if the request fails or the status is not 200.
/// - [`SearchError::Parse`] if the body cannot be decoded.
pub async fn fetch(
    client: &reqwest::Client,
    provider: Provider,
    url: &str,
    config: &SearchConfig,
) -> Result<FetchedPage, SearchError> {
    let headers = request_headers(provider, config)?;

    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| SearchError::Transport(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SearchError::Transport(format!(
            "{provider} status code error: {status}"
        )));
    }

    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Parse(format!("{provider} response read failed: {e}")))?;

    tracing::trace!(%provider, bytes = body.len(), "response received");

    Ok(FetchedPage {
        status,
        headers,
        body,
    })
}

fn header_value(value: &str) -> Result<HeaderValue, SearchError> {
    HeaderValue::from_str(value)
        .map_err(|e| SearchError::Transport(format!("invalid header value {value:?}: {e}")))
}
