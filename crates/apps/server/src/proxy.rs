//! Same-origin front for the browser client.
//!
//! `/api/*` is forwarded unchanged to the terrace backend and `/tiles/*` is
//! forwarded to the vector tile origin with its prefix stripped. Only reads
//! are proxied.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

const TILE_PREFIX: &str = "/tiles/";

#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub api_origin: String,
    pub tile_origin: String,
}

#[derive(Clone)]
pub struct ProxyState {
    config: Arc<ProxyConfig>,
    http: reqwest::Client,
}

impl ProxyState {
    pub fn new(config: ProxyConfig, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/*path", get(proxy_api))
        .route("/tiles/*path", get(proxy_tiles))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn proxy_api(State(state): State<ProxyState>, uri: Uri) -> Response {
    let target = upstream_url(&state.config.api_origin, uri.path(), uri.query());
    forward(&state.http, &target).await
}

async fn proxy_tiles(State(state): State<ProxyState>, uri: Uri) -> Response {
    let rest = uri.path().strip_prefix(TILE_PREFIX).unwrap_or_default();
    let target = upstream_url(&state.config.tile_origin, rest, uri.query());
    forward(&state.http, &target).await
}

/// Joins `origin` and `path` with exactly one slash and re-attaches a
/// non-empty query string.
pub fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

async fn forward(http: &reqwest::Client, target: &str) -> Response {
    let upstream = match http.get(target).send().await {
        Ok(resp) => resp,
        Err(err) => {
            warn!(%target, "upstream request failed: {err}");
            return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
        }
    };

    let status = upstream.status();
    if status.is_server_error() {
        warn!(%target, %status, "upstream error");
    }

    let mut headers = HeaderMap::new();
    for name in [CONTENT_TYPE, CONTENT_ENCODING, CACHE_CONTROL, ETAG, LAST_MODIFIED] {
        if let Some(value) = upstream.headers().get(&name) {
            headers.insert(name, value.clone());
        }
    }

    (status, headers, Body::from_stream(upstream.bytes_stream())).into_response()
}
