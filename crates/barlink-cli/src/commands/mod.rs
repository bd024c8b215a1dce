mod bars;
mod timeframe;

use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Runs the selected command and returns the JSON document to print.
pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Bars(args) => bars::run(args).await,
        Command::Timeframe(args) => timeframe::run(args),
    }
}
