use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Normalized market symbol/ticker.
///
/// Only trimming and uppercasing happen here. Whether a ticker exists is the
/// provider's call, so index and class tickers like `^GSPC` pass through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trims and uppercases a symbol. Blank input is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Ordered, de-duplicated symbols taken from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolList(Vec<Symbol>);

impl SymbolList {
    /// Splits on commas, trims and uppercases each piece and skips blanks.
    /// Repeated symbols keep their first position.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let mut symbols: Vec<Symbol> = Vec::new();
        for piece in raw.split(',').map(str::trim).filter(|piece| !piece.is_empty()) {
            let symbol = Symbol::parse(piece)?;
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        Ok(Self(symbols))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.0
    }

    /// Comma-joined wire form, e.g. `AAPL,TSLA`.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<'a> IntoIterator for &'a SymbolList {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
