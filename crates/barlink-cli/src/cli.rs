//! CLI argument definitions for barlink.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bars` | Fetch historical OHLCV bars for one or more symbols |
//! | `timeframe` | Parse and echo a timeframe string |
//!
//! # Examples
//!
//! ```bash
//! barlink bars AAPL,TSLA --interval 1Day --limit 30 --pretty
//! barlink bars SPY --interval 15Min --start 2024-01-02 --end 2024-01-03
//! barlink timeframe 4Hour
//! ```

use clap::{Args, Parser, Subcommand};

/// barlink - historical bars from Alpaca, one call for many symbols.
#[derive(Debug, Parser)]
#[command(name = "barlink", author, version, about)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch historical OHLCV bars.
    ///
    /// Prints a JSON object keyed by symbol. Every requested symbol is
    /// present, with an empty list when the provider had no data.
    ///
    /// Needs APCA_API_KEY_ID and APCA_API_SECRET_KEY.
    Bars(BarsArgs),

    /// Parse a timeframe such as 15Min or 1Day and print its parts.
    Timeframe(TimeframeArgs),
}

/// Arguments for the `bars` command.
#[derive(Debug, Args)]
pub struct BarsArgs {
    /// Comma-separated symbols, e.g. AAPL,TSLA.
    pub symbols: String,

    /// Bar interval: <amount><Min|Hour|Day|Week|Month>.
    #[arg(long, default_value = "15Min")]
    pub interval: String,

    /// Inclusive start, ISO-8601 (date or date-time).
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive end, ISO-8601 (date or date-time).
    #[arg(long)]
    pub end: Option<String>,

    /// Maximum number of bars across all symbols.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Corporate-action adjustment: raw, split, dividend, all.
    #[arg(long, default_value = "raw")]
    pub adjustment: String,

    /// Sort order: asc or desc.
    #[arg(long, default_value = "asc")]
    pub sort: String,

    /// Data feed, e.g. sip or iex.
    #[arg(long)]
    pub feed: Option<String>,
}

/// Arguments for the `timeframe` command.
#[derive(Debug, Args)]
pub struct TimeframeArgs {
    /// Timeframe text, e.g. 15Min.
    pub text: String,
}
