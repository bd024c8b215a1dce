//! # Barlink Core
//!
//! Contracts, domain types and vendor adapters for the barlink market-data
//! gateway.
//!
//! ## Overview
//!
//! - **Timeframe parsing** of `<amount><unit>` strings such as `15Min`
//! - **Bar normalization**: validate a loosely-typed query, issue one batched
//!   provider call, return bars keyed by every requested symbol
//! - **Provider adapters** for the Alpaca market-data and trading APIs and
//!   for Finnhub reference data
//! - **HTTP client abstraction** so adapters can be exercised without a
//!   network
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpaca bars, Alpaca trading, Finnhub |
//! | [`config`] | Environment-driven configuration |
//! | [`data_source`] | Provider contract, query and request types |
//! | [`domain`] | Symbols, intervals, timestamps, bars |
//! | [`error`] | Validation, fetch and config errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalizer`] | The bar service |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use barlink_core::{BarQuery, BarlinkConfig, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BarlinkConfig::from_env()?;
//!     let service = config.bar_service(Arc::new(ReqwestHttpClient::new()));
//!
//!     let query = BarQuery::new("AAPL,TSLA", "1Day").with_limit(10);
//!     let bars = service.fetch_bars(&query).await?;
//!
//!     for (symbol, rows) in bars.iter() {
//!         println!("{symbol}: {} bars", rows.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Caller mistakes are reported before any network traffic:
//!
//! ```rust
//! use barlink_core::{FetchError, Interval, ValidationError};
//!
//! let error = Interval::parse("5Days").unwrap_err();
//! assert!(matches!(error, ValidationError::InvalidTimeframeFormat { .. }));
//!
//! let fetch_error = FetchError::from(error);
//! assert!(fetch_error.is_bad_request());
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalizer;
pub mod source;

// Adapter implementations
pub use adapters::{
    AlpacaDataProvider, AlpacaTradingClient, FinnhubClient, OrderStatusFilter, OrderTicket,
    OrdersQuery,
};

// Configuration
pub use config::{AlpacaConfig, BarlinkConfig, FinnhubConfig};

// Provider contract
pub use data_source::{BarQuery, BarRequest, DataProvider, ProviderError, ProviderErrorKind};

// Domain models
pub use domain::{
    Adjustment, Bar, BarResult, BarRow, BarTable, Feed, Interval, IntervalUnit, SortOrder, Symbol,
    SymbolList, UtcDateTime,
};

// Error types
pub use error::{ConfigError, FetchError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use normalizer::{partition, BarService};

pub use source::ProviderId;
