use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use barlink_core::{BarQuery, BarResult, OrderTicket, OrdersQuery};
use serde::Deserialize;
use serde_json::{json, Value};

use super::query_params;
use crate::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/stocks/bars", get(stock_bars))
        .route("/account", get(account))
        .route("/positions", get(positions))
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/:order_id", delete(cancel_order))
        .route("/assets", get(assets))
}

async fn ping() -> Json<Value> {
    Json(json!({ "msg": "pong" }))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BarsParams {
    symbols: String,
    timeframe: String,
    limit: u32,
    adjustment: String,
    start: Option<String>,
    end: Option<String>,
    sort: String,
    feed: String,
}

impl Default for BarsParams {
    fn default() -> Self {
        Self {
            symbols: String::from("AAPL"),
            timeframe: String::from("15Min"),
            limit: 1000,
            adjustment: String::from("raw"),
            start: None,
            end: None,
            sort: String::from("asc"),
            feed: String::from("sip"),
        }
    }
}

impl From<BarsParams> for BarQuery {
    fn from(params: BarsParams) -> Self {
        let mut query = BarQuery::new(params.symbols, params.timeframe)
            .with_limit(params.limit)
            .with_adjustment(params.adjustment)
            .with_sort(params.sort)
            .with_feed(params.feed);
        query.start = params.start;
        query.end = params.end;
        query
    }
}

async fn stock_bars(
    State(state): State<AppState>,
    params: Result<Query<BarsParams>, QueryRejection>,
) -> Result<Json<BarResult>, ApiError> {
    let query = BarQuery::from(query_params(params)?);
    let bars = state.bars.fetch_bars(&query).await?;
    Ok(Json(bars))
}

async fn account(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let account = state.trading.account().await?;
    Ok(Json(json!({ "account": account })))
}

async fn positions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let positions = state.trading.positions().await?;
    Ok(Json(json!({ "positions": positions })))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OrdersParams {
    status: String,
    limit: u32,
}

impl Default for OrdersParams {
    fn default() -> Self {
        let defaults = OrdersQuery::default();
        Self {
            status: defaults.status.to_string(),
            limit: defaults.limit,
        }
    }
}

async fn list_orders(
    State(state): State<AppState>,
    params: Result<Query<OrdersParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query_params(params)?;
    let query = OrdersQuery::new(&params.status, params.limit)?;
    let orders = state.trading.orders(query).await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderTicket>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(ticket) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let ticket = ticket.normalized()?;
    let order = state.trading.submit_order(&ticket).await?;
    Ok(Json(json!({ "order": order })))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.trading.cancel_order(&order_id).await?;
    Ok(Json(json!({ "status": "cancelled", "order_id": order_id })))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AssetsParams {
    status: String,
    asset_class: String,
}

impl Default for AssetsParams {
    fn default() -> Self {
        Self {
            status: String::from("active"),
            asset_class: String::from("us_equity"),
        }
    }
}

async fn assets(
    State(state): State<AppState>,
    params: Result<Query<AssetsParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query_params(params)?;
    let assets = state
        .trading
        .assets(&params.status, &params.asset_class)
        .await?;
    Ok(Json(json!({ "assets": assets })))
}
