//! Transport tests against a local mock server.
//!
//! These exercise `http::fetch` end to end (headers on the wire, status
//! handling, body decoding, the request deadline) without touching any
//! real provider.

use std::time::Duration;

use grafisearch_scraper::http::{self, CONSENT_COOKIES, DESKTOP_USER_AGENT};
use grafisearch_scraper::providers::parse_duckduckgo_html;
use grafisearch_scraper::{Provider, SearchConfig, SearchError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DUCKDUCKGO_FIXTURE: &str = include_str!("../test-data/duckduckgo.html");

fn test_config() -> SearchConfig {
    SearchConfig {
        timeout_seconds: 2,
        ..Default::default()
    }
}

async fn serve(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ok_response_returns_body() {
    let server = serve(ResponseTemplate::new(200).set_body_string("<html>hello</html>")).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    let page = http::fetch(
        &client,
        Provider::DuckDuckGo,
        &format!("{}/search?q=x", server.uri()),
        &config,
    )
    .await
    .expect("fetch should succeed");

    assert_eq!(page.status, reqwest::StatusCode::OK);
    assert_eq!(page.body, "<html>hello</html>");
}

#[tokio::test]
async fn non_200_status_is_transport_error() {
    let server = serve(ResponseTemplate::new(503)).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    let err = http::fetch(
        &client,
        Provider::Google,
        &format!("{}/search?q=x", server.uri()),
        &config,
    )
    .await
    .expect_err("503 must fail");

    assert!(matches!(err, SearchError::Transport(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn no_content_status_is_transport_error() {
    let server = serve(ResponseTemplate::new(204)).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    let err = http::fetch(
        &client,
        Provider::YouTube,
        &format!("{}/search", server.uri()),
        &config,
    )
    .await
    .expect_err("only 200 is accepted");
    assert!(matches!(err, SearchError::Transport(_)));
}

#[tokio::test]
async fn strict_provider_sends_lynx_agent_and_consent_cookies() {
    let server = serve(ResponseTemplate::new(200).set_body_string("ok")).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    http::fetch(
        &client,
        Provider::Google,
        &format!("{}/search?q=rust", server.uri()),
        &config,
    )
    .await
    .expect("fetch");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;

    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .expect("user-agent header");
    assert!(ua.starts_with("Lynx/"), "unexpected UA: {ua}");
    assert!(ua.contains("libwww-FM/"));

    assert_eq!(
        headers.get("cookie").and_then(|v| v.to_str().ok()),
        Some(CONSENT_COOKIES)
    );
    assert_eq!(
        headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    assert_eq!(
        headers.get("accept-language").and_then(|v| v.to_str().ok()),
        Some(config.accept_language.as_str())
    );
}

#[tokio::test]
async fn other_providers_send_desktop_agent_without_cookies() {
    let server = serve(ResponseTemplate::new(200).set_body_string("ok")).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    http::fetch(
        &client,
        Provider::YouTube,
        &format!("{}/search", server.uri()),
        &config,
    )
    .await
    .expect("fetch");

    let requests = server.received_requests().await.expect("recording enabled");
    let headers = &requests[0].headers;
    assert_eq!(
        headers.get("user-agent").and_then(|v| v.to_str().ok()),
        Some(DESKTOP_USER_AGENT)
    );
    assert!(headers.get("cookie").is_none());
    assert!(headers.get("accept").is_some());
}

#[tokio::test]
async fn latin1_body_is_decoded_from_declared_charset() {
    let body = b"<html><body>caf\xe9</body></html>".to_vec();
    let server =
        serve(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1")).await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    let page = http::fetch(
        &client,
        Provider::Google,
        &format!("{}/search", server.uri()),
        &config,
    )
    .await
    .expect("fetch");

    assert!(page.body.contains("café"));
}

#[tokio::test]
async fn slow_response_hits_the_deadline() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_string("late")
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    let config = SearchConfig {
        timeout_seconds: 1,
        ..Default::default()
    };
    let client = http::build_client(&config).expect("client");

    let err = http::fetch(
        &client,
        Provider::DuckDuckGo,
        &format!("{}/search", server.uri()),
        &config,
    )
    .await
    .expect_err("deadline exceeded");
    assert!(matches!(err, SearchError::Transport(_)));
}

#[tokio::test]
async fn fetched_page_feeds_the_extractor() {
    let server = serve(
        ResponseTemplate::new(200).set_body_raw(DUCKDUCKGO_FIXTURE, "text/html; charset=utf-8"),
    )
    .await;
    let config = test_config();
    let client = http::build_client(&config).expect("client");

    let page = http::fetch(
        &client,
        Provider::DuckDuckGo,
        &format!("{}/search?q=rust", server.uri()),
        &config,
    )
    .await
    .expect("fetch");
    let results = parse_duckduckgo_html(&page.body, &config.blocklist()).expect("parse");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://example.com/page");
}
