use std::sync::Arc;

use barlink_core::{BarQuery, BarlinkConfig, ReqwestHttpClient};
use serde_json::Value;

use crate::cli::BarsArgs;
use crate::error::CliError;

pub async fn run(args: &BarsArgs) -> Result<Value, CliError> {
    let config = BarlinkConfig::from_env()?;
    let service = config.bar_service(Arc::new(ReqwestHttpClient::new()));

    let query = to_query(args);
    let bars = service.fetch_bars(&query).await?;
    tracing::debug!(symbols = bars.len(), total = bars.total_bars(), "bars fetched");

    Ok(serde_json::to_value(bars)?)
}

fn to_query(args: &BarsArgs) -> BarQuery {
    let mut query = BarQuery::new(args.symbols.as_str(), args.interval.as_str())
        .with_adjustment(args.adjustment.as_str())
        .with_sort(args.sort.as_str());
    query.start = args.start.clone();
    query.end = args.end.clone();
    query.limit = args.limit;
    query.feed = args.feed.clone();
    query
}
