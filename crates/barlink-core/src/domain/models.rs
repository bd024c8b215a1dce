use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Symbol, SymbolList, UtcDateTime, ValidationError};

/// Corporate-action adjustment applied to historical prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

impl Adjustment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Split => "split",
            Self::Dividend => "dividend",
            Self::All => "all",
        }
    }
}

impl Display for Adjustment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Adjustment {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "split" => Ok(Self::Split),
            "dividend" => Ok(Self::Dividend),
            "all" => Ok(Self::All),
            _ => Err(ValidationError::InvalidAdjustment {
                value: value.to_owned(),
            }),
        }
    }
}

/// Timestamp ordering requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidSort {
                value: value.to_owned(),
            }),
        }
    }
}

/// Provider data feed such as `sip`, `iex` or `otc`. Opaque to barlink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feed(String);

impl Feed {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_ascii_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Feed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OHLCV observation. Provider-specific fields (trade count, VWAP, ...)
/// travel in `extra` and are flattened into the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Bar {
    pub fn new(
        timestamp: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// A provider row, tagged with its symbol when the response carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub symbol: Option<Symbol>,
    pub bar: Bar,
}

impl BarRow {
    pub fn tagged(symbol: Symbol, bar: Bar) -> Self {
        Self {
            symbol: Some(symbol),
            bar,
        }
    }

    pub fn untagged(bar: Bar) -> Self {
        Self { symbol: None, bar }
    }
}

/// Tabular provider response, rows in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarTable {
    pub rows: Vec<BarRow>,
}

impl BarTable {
    pub fn new(rows: Vec<BarRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Bars grouped per symbol, keyed in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BarResult(IndexMap<Symbol, Vec<Bar>>);

impl BarResult {
    /// One empty entry per requested symbol.
    pub fn with_symbols(symbols: &SymbolList) -> Self {
        Self(
            symbols
                .iter()
                .map(|symbol| (symbol.clone(), Vec::new()))
                .collect(),
        )
    }

    pub fn get(&self, symbol: &str) -> Option<&[Bar]> {
        self.0
            .iter()
            .find(|(key, _)| key.as_str() == symbol)
            .map(|(_, bars)| bars.as_slice())
    }

    pub fn get_mut(&mut self, symbol: &Symbol) -> Option<&mut Vec<Bar>> {
        self.0.get_mut(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Vec<Bar>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_bars(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}
