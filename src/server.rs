//! HTTP surface: the HTML shell, the JSON search API and built assets.
//!
//! ## Endpoints
//!
//! - `GET /` HTML shell; with `?q=` the merged results are rendered inline
//! - `GET /api/search?q=&providers=` merged results and failures as JSON
//! - `GET /assets/{*path}` built asset, or a redirect to the Vite dev server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use grafisearch_scraper::{Aggregated, Provider, SearchConfig, SearchError};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::assets::ViteAssets;
use crate::config::AppConfig;
use crate::error::{AppError, Result};

#[derive(Debug)]
struct AppState {
    search: SearchConfig,
    assets: ViteAssets,
}

/// Query string shared by `/` and `/api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Comma-separated provider names overriding the configured list.
    pub providers: Option<String>,
}

/// Build the application router.
pub fn router(search: SearchConfig, assets: ViteAssets) -> Router {
    let state = Arc::new(AppState { search, assets });

    Router::new()
        .route("/", get(handle_page))
        .route("/api/search", get(handle_api_search))
        .route("/assets/{*path}", get(handle_asset))
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    // Path only: the query string holds the user's search terms.
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Running HTTP server.
pub struct Server {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl Server {
    /// Bind `{server.host}:{server.port}` and start serving in a background task.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Server`] if the listener cannot bind.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        let assets =
            ViteAssets::load(&config.server.assets_dir).with_vite_port(config.server.vite_port);
        let app = router(config.search.clone(), assets);

        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("failed to get local addr: {e}")))?;

        info!("grafisearch listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server task to end.
    pub async fn wait(mut self) {
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                tracing::error!("server task failed: {e}");
            }
        }
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The configured search settings with the request's provider override.
fn effective_config(
    base: &SearchConfig,
    providers: Option<&str>,
) -> std::result::Result<SearchConfig, String> {
    let mut config = base.clone();
    if let Some(list) = providers.filter(|l| !l.trim().is_empty()) {
        config.providers = list
            .split(',')
            .map(str::parse::<Provider>)
            .collect::<std::result::Result<_, _>>()?;
    }
    Ok(config)
}

async fn handle_api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "missing query parameter `q`");
    }
    let config = match effective_config(&state.search, params.providers.as_deref()) {
        Ok(config) => config,
        Err(e) => return error_json(StatusCode::BAD_REQUEST, &e),
    };

    match grafisearch_scraper::search(query, &config).await {
        Ok(aggregated) => Json(aggregated).into_response(),
        Err(e @ SearchError::Config(_)) => error_json(StatusCode::BAD_REQUEST, &e.to_string()),
        Err(e) => error_json(StatusCode::BAD_GATEWAY, &e.to_string()),
    }
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn handle_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let query = params.q.trim();
    let body = if query.is_empty() {
        String::new()
    } else {
        match effective_config(&state.search, params.providers.as_deref()) {
            Ok(config) => match grafisearch_scraper::search(query, &config).await {
                Ok(aggregated) => render_results(&aggregated),
                Err(e) => render_error(&e.to_string()),
            },
            Err(e) => render_error(&e),
        }
    };
    Html(render_page(&state.assets.head_html(), query, &body))
}

async fn handle_asset(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    if !state.assets.is_production() {
        let location = dev_server_url(request.headers(), state.assets.vite_port(), &path);
        return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
    }
    let Some(file) = state.assets.resolve_asset(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Same asset path on the Vite dev server, keeping the request's host name.
fn dev_server_url(headers: &HeaderMap, vite_port: u16, path: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(strip_port)
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");
    format!("http://{host}:{vite_port}/assets/{}", path.trim_start_matches('/'))
}

/// Host part of a `Host` header value. IPv6 literals keep their brackets.
fn strip_port(host: &str) -> &str {
    let Some((name, port)) = host.rsplit_once(':') else {
        return host;
    };
    let bare_ipv6 = name.contains(':') && !name.ends_with(']');
    if port.bytes().all(|b| b.is_ascii_digit()) && !bare_ipv6 {
        name
    } else {
        host
    }
}

fn render_page(head: &str, query: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{head}
</head>
<body>
<form action="/" method="get"><input type="search" name="q" value="{value}"></form>
<main id="results">{body}</main>
</body>
</html>"#,
        title = if query.is_empty() {
            "Grafisearch".to_owned()
        } else {
            format!("{} - Grafisearch", html_escape(query))
        },
        value = html_escape(query),
    )
}

fn render_results(aggregated: &Aggregated) -> String {
    let mut html = String::from(r#"<ol class="results">"#);
    for r in &aggregated.results {
        html.push_str(&format!(
            r#"<li><a href="{url}">{title}</a> <span class="site">{site}</span><p>{desc}</p></li>"#,
            url = html_escape(&r.url),
            title = html_escape(&r.title),
            site = html_escape(&r.site_name),
            desc = html_escape(&r.desc),
        ));
    }
    html.push_str("</ol>");
    for failure in &aggregated.failures {
        html.push_str(&format!(
            r#"<p class="provider-error">{}: {}</p>"#,
            failure.provider,
            html_escape(&failure.error)
        ));
    }
    html
}

fn render_error(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, html_escape(message))
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use grafisearch_scraper::SearchResult;
    use grafisearch_scraper::orchestrator::aggregate::ProviderFailure;

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn provider_override_parses_names() {
        let base = SearchConfig::default();
        let config = effective_config(&base, Some("youtube, ddg")).expect("valid");
        assert_eq!(config.providers, vec![Provider::YouTube, Provider::DuckDuckGo]);

        let unchanged = effective_config(&base, Some("  ")).expect("valid");
        assert_eq!(unchanged.providers, base.providers);

        assert!(effective_config(&base, Some("altavista")).is_err());
    }

    #[test]
    fn dev_server_url_keeps_host_name() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("192.168.1.5:8000"));
        assert_eq!(
            dev_server_url(&headers, 3000, "main.tsx"),
            "http://192.168.1.5:3000/assets/main.tsx"
        );
        assert_eq!(
            dev_server_url(&HeaderMap::new(), 3000, "x.css"),
            "http://localhost:3000/assets/x.css"
        );
    }

    #[test]
    fn dev_server_url_handles_ipv6_and_portless_hosts() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("[::1]:8000"));
        assert_eq!(
            dev_server_url(&headers, 3000, "main.tsx"),
            "http://[::1]:3000/assets/main.tsx"
        );

        headers.insert(header::HOST, HeaderValue::from_static("[::1]"));
        assert_eq!(
            dev_server_url(&headers, 3000, "main.tsx"),
            "http://[::1]:3000/assets/main.tsx"
        );

        headers.insert(header::HOST, HeaderValue::from_static("example.test"));
        assert_eq!(
            dev_server_url(&headers, 3000, "x.css"),
            "http://example.test:3000/assets/x.css"
        );
    }

    #[test]
    fn results_are_escaped() {
        let aggregated = Aggregated {
            results: vec![SearchResult {
                url: "https://example.com/?a=1&b=2".into(),
                title: "<script>alert(1)</script>".into(),
                desc: "A & B".into(),
                domain: "example.com".into(),
                site_name: "example.com".into(),
                author: String::new(),
            }],
            failures: vec![ProviderFailure {
                provider: Provider::Google,
                error: "status <429>".into(),
            }],
        };
        let html = render_results(&aggregated);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(r#"href="https://example.com/?a=1&amp;b=2""#));
        assert!(html.contains("Google: status &lt;429&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn page_embeds_head_and_escaped_query() {
        let html = render_page("<script src=\"/assets/main.js\"></script>", "a \"b\"", "");
        assert!(html.contains("<script src=\"/assets/main.js\"></script>"));
        assert!(html.contains(r#"value="a &quot;b&quot;""#));
    }
}
