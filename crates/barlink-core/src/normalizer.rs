//! Historical bar request normalization.
//!
//! [`BarService`] turns a raw [`BarQuery`] into one [`BarRequest`], sends it
//! to the injected [`DataProvider`] and regroups the returned rows per symbol.
//! Every requested symbol is a key of the returned [`BarResult`], including
//! symbols the provider had no rows for.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::data_source::{BarQuery, BarRequest, DataProvider, ProviderError};
use crate::error::{FetchError, ValidationError};
use crate::{Adjustment, BarResult, BarTable, Feed, Interval, SortOrder, SymbolList, UtcDateTime};

/// Stateless bar fetcher around a shared provider handle.
#[derive(Clone)]
pub struct BarService {
    provider: Arc<dyn DataProvider>,
}

impl BarService {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self { provider }
    }

    /// Validates `query`. Returns `Ok(None)` when it names no symbols.
    pub fn normalize(query: &BarQuery) -> Result<Option<BarRequest>, ValidationError> {
        let symbols = SymbolList::parse(&query.symbols)?;
        if symbols.is_empty() {
            return Ok(None);
        }

        let interval = Interval::parse(&query.interval)?;
        let start = parse_bound(query.start.as_deref())?;
        let end = parse_bound(query.end.as_deref())?;
        let limit = query
            .limit
            .map(|value| NonZeroU32::new(value).ok_or(ValidationError::InvalidLimit { value }))
            .transpose()?;
        let adjustment = query.adjustment.parse::<Adjustment>()?;
        let sort = query.sort.parse::<SortOrder>()?;
        let feed = query.feed.as_deref().and_then(Feed::parse);

        Ok(Some(BarRequest {
            symbols,
            interval,
            start,
            end,
            limit,
            adjustment,
            sort,
            feed,
        }))
    }

    /// Fetches bars for every symbol of `query` with a single provider call.
    ///
    /// # Errors
    ///
    /// [`FetchError::BadRequest`] for malformed input, raised before the
    /// provider is contacted. [`FetchError::Upstream`] when the provider fails
    /// or answers with rows that cannot be attributed to a symbol.
    pub async fn fetch_bars(&self, query: &BarQuery) -> Result<BarResult, FetchError> {
        let Some(request) = Self::normalize(query)? else {
            tracing::debug!(raw = %query.symbols, "no symbols requested, skipping provider");
            return Ok(BarResult::default());
        };

        tracing::debug!(
            provider = %self.provider.id(),
            symbols = %request.symbols.joined(),
            interval = %request.interval,
            "fetching bars"
        );

        let table = self.provider.get_bars(&request).await.map_err(|error| {
            tracing::warn!(provider = %self.provider.id(), %error, "bar fetch failed");
            error
        })?;

        Ok(partition(&request.symbols, table)?)
    }
}

fn parse_bound(raw: Option<&str>) -> Result<Option<UtcDateTime>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => UtcDateTime::parse(value).map(Some),
    }
}

/// Groups provider rows per requested symbol, keeping provider row order.
pub fn partition(symbols: &SymbolList, table: BarTable) -> Result<BarResult, ProviderError> {
    let mut result = BarResult::with_symbols(symbols);
    let sole_symbol = match symbols.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };

    for row in table.rows {
        let symbol = match (row.symbol, &sole_symbol) {
            (Some(symbol), _) => symbol,
            (None, Some(only)) => only.clone(),
            (None, None) => {
                return Err(ProviderError::malformed_response(format!(
                    "provider returned rows without a symbol for multi-symbol request '{}'",
                    symbols.joined()
                )));
            }
        };

        match result.get_mut(&symbol) {
            Some(bars) => bars.push(row.bar),
            None => tracing::warn!(%symbol, "dropping bar for symbol that was not requested"),
        }
    }

    Ok(result)
}
