use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use barlink_core::{FinnhubClient, UtcDateTime};
use serde::Deserialize;
use serde_json::{json, Value};

use super::query_params;
use crate::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/stocks", get(stocks))
        .route("/profile/:symbol", get(profile))
}

fn client(state: &AppState) -> Result<&FinnhubClient, ApiError> {
    state
        .finnhub
        .as_ref()
        .ok_or(ApiError::NotConfigured("FNHB_API_KEY"))
}

async fn ping() -> Json<Value> {
    Json(json!({
        "msg": "Finnhub client is ready",
        "timestamp": UtcDateTime::now().format_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct StocksParams {
    #[serde(default = "default_exchange")]
    exchange: String,
}

fn default_exchange() -> String {
    String::from("US")
}

async fn stocks(
    State(state): State<AppState>,
    params: Result<Query<StocksParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query_params(params)?;
    let symbols = client(&state)?.stock_symbols(&params.exchange).await?;
    Ok(Json(symbols))
}

async fn profile(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = client(&state)?.company_profile(&symbol).await?;
    Ok(Json(json!({
        "symbol": symbol.trim().to_ascii_uppercase(),
        "profile": profile,
    })))
}
