use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod proxy;

use proxy::{ProxyConfig, ProxyState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("TERRACE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("invalid TERRACE_ADDR");

    let config = ProxyConfig {
        api_origin: env::var("API_ORIGIN").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
        tile_origin: env::var("TILE_ORIGIN")
            .unwrap_or_else(|_| "https://tiles.openfreemap.org".to_string()),
    };
    let timeout = Duration::from_secs(env_var_u64("PROXY_TIMEOUT_SECS", 15));
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build upstream client");

    info!(api = %config.api_origin, tiles = %config.tile_origin, "upstreams configured");
    let app = proxy::router(ProxyState::new(config, http));

    info!("terrace proxy listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
