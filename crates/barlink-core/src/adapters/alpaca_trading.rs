//! Pass-through client for the Alpaca trading API.
//!
//! Account, position, order and asset payloads are returned as opaque JSON.
//! Only the inputs barlink itself accepts are validated here; everything
//! else is the vendor's call.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AlpacaConfig;
use crate::data_source::ProviderError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{ProviderId, ValidationError};

use super::execute_json;

const MAX_ORDER_LISTING: u32 = 500;

/// Order listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusFilter {
    Open,
    Closed,
    #[default]
    All,
}

impl OrderStatusFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl Display for OrderStatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            _ => Err(ValidationError::InvalidOrderStatus {
                value: value.to_owned(),
            }),
        }
    }
}

/// Validated `GET /v2/orders` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersQuery {
    pub status: OrderStatusFilter,
    pub limit: u32,
}

impl OrdersQuery {
    pub fn new(status: &str, limit: u32) -> Result<Self, ValidationError> {
        let status = status.parse::<OrderStatusFilter>()?;
        if limit == 0 || limit > MAX_ORDER_LISTING {
            return Err(ValidationError::InvalidOrderLimit { value: limit });
        }
        Ok(Self { status, limit })
    }
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            status: OrderStatusFilter::All,
            limit: 50,
        }
    }
}

/// Order submission payload, forwarded as-is after light normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderTicket {
    pub symbol: String,
    pub qty: u32,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
}

impl Default for OrderTicket {
    fn default() -> Self {
        Self {
            symbol: String::from("AAPL"),
            qty: 1,
            side: String::from("buy"),
            order_type: String::from("market"),
            time_in_force: String::from("day"),
        }
    }
}

impl OrderTicket {
    /// Uppercases the symbol, lowercases the side, rejects a zero quantity.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        if self.qty == 0 {
            return Err(ValidationError::InvalidOrderQuantity { value: self.qty });
        }
        Ok(Self {
            symbol: self.symbol.trim().to_ascii_uppercase(),
            side: self.side.trim().to_ascii_lowercase(),
            ..self
        })
    }
}

/// Thin wrapper over the trading REST API.
#[derive(Clone)]
pub struct AlpacaTradingClient {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl AlpacaTradingClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &AlpacaConfig) -> Self {
        Self {
            http_client,
            auth: config.auth(),
            base_url: config.trading_url.trim_end_matches('/').to_owned(),
            timeout_ms: crate::config::DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub async fn account(&self) -> Result<Value, ProviderError> {
        self.send(HttpRequest::get(self.url("/v2/account"))).await
    }

    pub async fn positions(&self) -> Result<Value, ProviderError> {
        self.send(HttpRequest::get(self.url("/v2/positions"))).await
    }

    pub async fn orders(&self, query: OrdersQuery) -> Result<Value, ProviderError> {
        let url = self.url(&format!(
            "/v2/orders?status={}&limit={}",
            query.status, query.limit
        ));
        self.send(HttpRequest::get(url)).await
    }

    pub async fn submit_order(&self, ticket: &OrderTicket) -> Result<Value, ProviderError> {
        let body = serde_json::to_string(ticket).map_err(|error| {
            ProviderError::rejected(format!("order ticket could not be encoded: {error}"))
        })?;
        tracing::info!(symbol = %ticket.symbol, side = %ticket.side, qty = ticket.qty, "submitting order");
        self.send(HttpRequest::post(self.url("/v2/orders")).with_json_body(body))
            .await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<Value, ProviderError> {
        let url = self.url(&format!("/v2/orders/{}", urlencoding::encode(order_id)));
        self.send(HttpRequest::delete(url)).await
    }

    pub async fn assets(&self, status: &str, asset_class: &str) -> Result<Value, ProviderError> {
        let url = self.url(&format!(
            "/v2/assets?status={}&asset_class={}",
            urlencoding::encode(status),
            urlencoding::encode(asset_class)
        ));
        self.send(HttpRequest::get(url)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: HttpRequest) -> Result<Value, ProviderError> {
        let request = request.with_auth(&self.auth).with_timeout_ms(self.timeout_ms);
        execute_json(self.http_client.as_ref(), ProviderId::Alpaca, request).await
    }
}
