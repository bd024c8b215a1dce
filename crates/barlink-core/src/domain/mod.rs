//! # Domain Models
//!
//! Typed values that raw query inputs are parsed into before anything is
//! sent upstream.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Interval`] | Bar granularity parsed from strings like `15Min` |
//! | [`Symbol`] / [`SymbolList`] | Uppercased tickers, comma-list parsing |
//! | [`UtcDateTime`] | ISO-8601 timestamps normalized to UTC |
//! | [`Bar`] | OHLCV record with provider extras |
//! | [`BarTable`] | Provider rows, optionally symbol-tagged |
//! | [`BarResult`] | Bars grouped per requested symbol |

mod interval;
mod models;
mod symbol;
mod timestamp;

pub use interval::{Interval, IntervalUnit};
pub use models::{Adjustment, Bar, BarResult, BarRow, BarTable, Feed, SortOrder};
pub use symbol::{Symbol, SymbolList};
pub use timestamp::UtcDateTime;
