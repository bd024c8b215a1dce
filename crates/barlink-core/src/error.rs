use thiserror::Error;

use crate::data_source::ProviderError;

/// Validation errors raised while turning raw inputs into typed requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("Invalid timeframe format: '{value}'. Expected format like '1Min', '1Day', etc.")]
    InvalidTimeframeFormat { value: String },
    #[error("Invalid timeframe unit '{unit}' in '{value}'")]
    InvalidTimeframeUnit { value: String, unit: String },

    #[error("invalid timestamp '{value}': {detail}")]
    InvalidTimestamp { value: String, detail: String },

    #[error("limit must be a positive integer, got {value}")]
    InvalidLimit { value: u32 },
    #[error("invalid adjustment '{value}', expected one of raw, split, dividend, all")]
    InvalidAdjustment { value: String },
    #[error("invalid sort '{value}', expected asc or desc")]
    InvalidSort { value: String },

    #[error("invalid order status '{value}', expected one of open, closed, all")]
    InvalidOrderStatus { value: String },
    #[error("order listing limit {value} is outside 1..=500")]
    InvalidOrderLimit { value: u32 },
    #[error("order quantity must be positive, got {value}")]
    InvalidOrderQuantity { value: u32 },
}

/// Failure of a single `fetch_bars` round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("bad request: {0}")]
    BadRequest(#[from] ValidationError),

    #[error("upstream error: {0}")]
    Upstream(#[from] ProviderError),
}

impl FetchError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
        }
    }

    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}

/// Startup configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable '{name}'")]
    Missing { name: &'static str },

    #[error("environment variable '{name}' has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}
