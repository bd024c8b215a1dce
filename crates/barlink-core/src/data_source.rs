//! Provider contract and request/response types for historical bars.
//!
//! [`DataProvider`] is the seam between barlink and an upstream market-data
//! vendor. It receives one fully validated [`BarRequest`] carrying every
//! requested symbol and answers with a [`BarTable`].
//!
//! ```rust,ignore
//! use barlink_core::{BarRequest, DataProvider, Interval, SymbolList};
//!
//! async fn count_rows(provider: &dyn DataProvider) -> Result<usize, barlink_core::ProviderError> {
//!     let symbols = SymbolList::parse("AAPL,TSLA").expect("valid symbols");
//!     let request = BarRequest::new(symbols, Interval::parse("1Day").expect("valid"));
//!     Ok(provider.get_bars(&request).await?.len())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;

use crate::{
    Adjustment, BarTable, Feed, Interval, ProviderId, SortOrder, SymbolList, UtcDateTime,
};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Unavailable,
    RateLimited,
    Unauthorized,
    Rejected,
    MalformedResponse,
}

/// Structured upstream failure. The message keeps the vendor's own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
    status: Option<u16>,
}

impl ProviderError {
    fn with_kind(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::RateLimited, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Unauthorized, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Rejected, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::MalformedResponse, message)
    }

    /// Classifies a non-success HTTP status returned by `provider`.
    pub fn from_status(provider: ProviderId, status: u16, detail: &str) -> Self {
        let message = format!("{provider} returned status {status}: {detail}");
        let kind = match status {
            401 | 403 => ProviderErrorKind::Unauthorized,
            429 => ProviderErrorKind::RateLimited,
            400..=499 => ProviderErrorKind::Rejected,
            _ => ProviderErrorKind::Unavailable,
        };
        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Upstream HTTP status, when the failure came from a response.
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::RateLimited => "provider.rate_limited",
            ProviderErrorKind::Unauthorized => "provider.unauthorized",
            ProviderErrorKind::Rejected => "provider.rejected",
            ProviderErrorKind::MalformedResponse => "provider.malformed_response",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// Raw `fetch_bars` inputs as received from a hosting layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarQuery {
    pub symbols: String,
    pub interval: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<u32>,
    pub adjustment: String,
    pub sort: String,
    pub feed: Option<String>,
}

impl BarQuery {
    pub fn new(symbols: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbols: symbols.into(),
            interval: interval.into(),
            start: None,
            end: None,
            limit: None,
            adjustment: String::from(Adjustment::Raw.as_str()),
            sort: String::from(SortOrder::Asc.as_str()),
            feed: None,
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_adjustment(mut self, adjustment: impl Into<String>) -> Self {
        self.adjustment = adjustment.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }
}

/// Validated, provider-agnostic historical bar request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRequest {
    pub symbols: SymbolList,
    pub interval: Interval,
    pub start: Option<UtcDateTime>,
    pub end: Option<UtcDateTime>,
    pub limit: Option<NonZeroU32>,
    pub adjustment: Adjustment,
    pub sort: SortOrder,
    pub feed: Option<Feed>,
}

impl BarRequest {
    pub fn new(symbols: SymbolList, interval: Interval) -> Self {
        Self {
            symbols,
            interval,
            start: None,
            end: None,
            limit: None,
            adjustment: Adjustment::default(),
            sort: SortOrder::default(),
            feed: None,
        }
    }
}

/// Market-data vendor contract.
///
/// Implementations must be `Send + Sync`: a single handle is shared by every
/// in-flight request of the hosting server.
pub trait DataProvider: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches bars for every symbol of `req` in one logical call.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the vendor is unreachable, rejects the
    /// request, or answers with a body that cannot be decoded.
    fn get_bars<'a>(
        &'a self,
        req: &'a BarRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarTable, ProviderError>> + Send + 'a>>;
}
