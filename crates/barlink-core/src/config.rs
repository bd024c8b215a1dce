//! Environment-driven configuration.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `APCA_API_KEY_ID` | yes | - |
//! | `APCA_API_SECRET_KEY` | yes | - |
//! | `APCA_DATA_URL` | no | `https://data.alpaca.markets` |
//! | `APCA_TRADING_URL` | no | `https://paper-api.alpaca.markets` |
//! | `FNHB_API_KEY` | no | Finnhub routes disabled when unset |
//! | `FINNHUB_BASE_URL` | no | `https://finnhub.io/api/v1` |
//! | `BARLINK_HTTP_TIMEOUT_MS` | no | `10000` |
//!
//! Keys are never written to logs; the `Debug` impls redact them.

use std::env;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::adapters::{AlpacaDataProvider, AlpacaTradingClient, FinnhubClient};
use crate::error::ConfigError;
use crate::http_client::{HttpAuth, HttpClient};
use crate::normalizer::BarService;

pub const DEFAULT_ALPACA_DATA_URL: &str = "https://data.alpaca.markets";
pub const DEFAULT_ALPACA_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Alpaca credentials and endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct AlpacaConfig {
    pub key_id: String,
    pub secret_key: String,
    pub data_url: String,
    pub trading_url: String,
}

impl AlpacaConfig {
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
            data_url: String::from(DEFAULT_ALPACA_DATA_URL),
            trading_url: String::from(DEFAULT_ALPACA_TRADING_URL),
        }
    }

    pub fn auth(&self) -> HttpAuth {
        HttpAuth::alpaca(&self.key_id, &self.secret_key)
    }
}

impl Debug for AlpacaConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("key_id", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("data_url", &self.data_url)
            .field("trading_url", &self.trading_url)
            .finish()
    }
}

/// Finnhub credentials and endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct FinnhubConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Debug for FinnhubConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarlinkConfig {
    pub alpaca: AlpacaConfig,
    pub finnhub: Option<FinnhubConfig>,
    pub http_timeout_ms: u64,
}

impl BarlinkConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| read(name).ok_or(ConfigError::Missing { name });

        let alpaca = AlpacaConfig {
            key_id: required("APCA_API_KEY_ID")?,
            secret_key: required("APCA_API_SECRET_KEY")?,
            data_url: read("APCA_DATA_URL")
                .unwrap_or_else(|| String::from(DEFAULT_ALPACA_DATA_URL)),
            trading_url: read("APCA_TRADING_URL")
                .unwrap_or_else(|| String::from(DEFAULT_ALPACA_TRADING_URL)),
        };

        let finnhub = read("FNHB_API_KEY").map(|api_key| FinnhubConfig {
            api_key,
            base_url: read("FINNHUB_BASE_URL")
                .unwrap_or_else(|| String::from(DEFAULT_FINNHUB_BASE_URL)),
        });

        let http_timeout_ms = match read("BARLINK_HTTP_TIMEOUT_MS") {
            None => DEFAULT_HTTP_TIMEOUT_MS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::Invalid {
                    name: "BARLINK_HTTP_TIMEOUT_MS",
                    value: raw,
                })?,
        };

        Ok(Self {
            alpaca,
            finnhub,
            http_timeout_ms,
        })
    }

    /// Bar service backed by the Alpaca market-data API.
    pub fn bar_service(&self, http_client: Arc<dyn HttpClient>) -> BarService {
        let provider = AlpacaDataProvider::new(http_client, &self.alpaca)
            .with_timeout_ms(self.http_timeout_ms);
        BarService::new(Arc::new(provider))
    }

    pub fn trading_client(&self, http_client: Arc<dyn HttpClient>) -> AlpacaTradingClient {
        AlpacaTradingClient::new(http_client, &self.alpaca).with_timeout_ms(self.http_timeout_ms)
    }

    /// `None` when no Finnhub key is configured.
    pub fn finnhub_client(&self, http_client: Arc<dyn HttpClient>) -> Option<FinnhubClient> {
        self.finnhub.as_ref().map(|finnhub| {
            FinnhubClient::new(http_client, finnhub).with_timeout_ms(self.http_timeout_ms)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = BarlinkConfig::from_lookup(lookup(&[
            ("APCA_API_KEY_ID", "id"),
            ("APCA_API_SECRET_KEY", "secret"),
        ]))
        .expect("valid config");

        assert_eq!(config.alpaca.data_url, DEFAULT_ALPACA_DATA_URL);
        assert_eq!(config.alpaca.trading_url, DEFAULT_ALPACA_TRADING_URL);
        assert_eq!(config.finnhub, None);
        assert_eq!(config.http_timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
    }

    #[test]
    fn missing_alpaca_secret_is_reported() {
        let error = BarlinkConfig::from_lookup(lookup(&[
            ("APCA_API_KEY_ID", "id"),
            ("APCA_API_SECRET_KEY", "  "),
        ]))
        .expect_err("secret missing");

        assert_eq!(
            error,
            ConfigError::Missing {
                name: "APCA_API_SECRET_KEY"
            }
        );
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let error = BarlinkConfig::from_lookup(lookup(&[
            ("APCA_API_KEY_ID", "id"),
            ("APCA_API_SECRET_KEY", "secret"),
            ("BARLINK_HTTP_TIMEOUT_MS", "soon"),
        ]))
        .expect_err("invalid timeout");

        assert!(matches!(error, ConfigError::Invalid { .. }));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = BarlinkConfig::from_lookup(lookup(&[
            ("APCA_API_KEY_ID", "id-123"),
            ("APCA_API_SECRET_KEY", "secret-456"),
            ("FNHB_API_KEY", "fh-789"),
        ]))
        .expect("valid config");

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("id-123"));
        assert!(!rendered.contains("secret-456"));
        assert!(!rendered.contains("fh-789"));
    }
}
