//! # Barlink Web
//!
//! axum backend exposing barlink over HTTP.
//!
//! | Prefix | Backed by |
//! |--------|-----------|
//! | `/`, `/health` | service info |
//! | `/alpaca` | [`BarService`] for bars, [`AlpacaTradingClient`] for the paper account |
//! | `/api` | [`FinnhubClient`], answering 503 when no key is configured |
//!
//! Handlers never reach for globals: every vendor handle lives in
//! [`AppState`], so tests can swap in fakes.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use barlink_core::{AlpacaTradingClient, BarService, BarlinkConfig, FinnhubClient, HttpClient};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub bars: BarService,
    pub trading: AlpacaTradingClient,
    pub finnhub: Option<FinnhubClient>,
    pub version: String,
}

impl AppState {
    pub fn from_config(config: &BarlinkConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            bars: config.bar_service(Arc::clone(&http_client)),
            trading: config.trading_client(Arc::clone(&http_client)),
            finnhub: config.finnhub_client(http_client),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Builds the full router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::meta::router())
        .nest("/alpaca", routes::alpaca::router())
        .nest("/api", routes::finnhub::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
