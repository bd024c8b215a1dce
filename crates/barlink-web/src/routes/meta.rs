use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "barlink market data API",
        "version": state.version,
        "endpoints": {
            "bars": "/alpaca/stocks/bars",
            "alpaca_trading": "/alpaca",
            "stock_analysis": "/api/stocks",
        },
        "status": "healthy",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "barlink" }))
}
