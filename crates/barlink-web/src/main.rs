//! barlink HTTP server.
//!
//! # Environment Variables
//!
//! See `barlink_core::config` for vendor credentials. Additionally:
//! - `BARLINK_BIND`: listen address (default: `0.0.0.0:8000`)
//! - `RUST_LOG`: log filter (default: `info`)

use std::net::SocketAddr;
use std::sync::Arc;

use barlink_core::{BarlinkConfig, ReqwestHttpClient};
use barlink_web::{create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = BarlinkConfig::from_env().inspect_err(|error| {
        tracing::error!(%error, "configuration invalid, refusing to start");
    })?;
    tracing::info!(
        data_url = %config.alpaca.data_url,
        trading_url = %config.alpaca.trading_url,
        finnhub = config.finnhub.is_some(),
        timeout_ms = config.http_timeout_ms,
        "configuration loaded"
    );

    let state = AppState::from_config(&config, Arc::new(ReqwestHttpClient::new()));
    let app = create_router(state);

    let bind = std::env::var("BARLINK_BIND").unwrap_or_else(|_| String::from(DEFAULT_BIND));
    let addr: SocketAddr = bind.parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barlink_web=info,barlink_core=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(error) => {
            tracing::error!(%error, "failed to listen for Ctrl+C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
