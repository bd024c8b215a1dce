use std::sync::Arc;

use serde_json::Value;

use crate::config::FinnhubConfig;
use crate::data_source::ProviderError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::ProviderId;

use super::execute_json;

/// Finnhub reference-data lookups. Payloads are passed through untouched.
#[derive(Clone)]
pub struct FinnhubClient {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl FinnhubClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &FinnhubConfig) -> Self {
        Self {
            http_client,
            auth: HttpAuth::Header {
                name: String::from("X-Finnhub-Token"),
                value: config.api_key.clone(),
            },
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout_ms: crate::config::DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Listed symbols for `exchange`, restricted to the Nasdaq MIC.
    pub async fn stock_symbols(&self, exchange: &str) -> Result<Value, ProviderError> {
        let exchange = exchange.trim().to_ascii_uppercase();
        let url = format!(
            "{}/stock/symbol?exchange={}&mic=XNAS",
            self.base_url,
            urlencoding::encode(&exchange)
        );
        self.send(HttpRequest::get(url)).await
    }

    pub async fn company_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let url = format!(
            "{}/stock/profile2?symbol={}",
            self.base_url,
            urlencoding::encode(&symbol)
        );
        self.send(HttpRequest::get(url)).await
    }

    async fn send(&self, request: HttpRequest) -> Result<Value, ProviderError> {
        let request = request.with_auth(&self.auth).with_timeout_ms(self.timeout_ms);
        tracing::debug!(url = %request.url, "finnhub request");
        execute_json(self.http_client.as_ref(), ProviderId::Finnhub, request).await
    }
}
