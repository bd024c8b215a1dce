use barlink_core::{Interval, IntervalUnit};
use serde::Serialize;
use serde_json::Value;

use crate::cli::TimeframeArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct TimeframeData {
    amount: u64,
    unit: IntervalUnit,
    canonical: String,
}

pub fn run(args: &TimeframeArgs) -> Result<Value, CliError> {
    let interval = Interval::parse(&args.text)?;
    let data = TimeframeData {
        amount: interval.amount(),
        unit: interval.unit(),
        canonical: interval.to_string(),
    };
    Ok(serde_json::to_value(data)?)
}
