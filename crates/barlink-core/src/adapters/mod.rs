mod alpaca;
mod alpaca_trading;
mod finnhub;

pub use alpaca::{AlpacaDataProvider, MAX_PAGE_SIZE};
pub use alpaca_trading::{AlpacaTradingClient, OrderStatusFilter, OrderTicket, OrdersQuery};
pub use finnhub::FinnhubClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::data_source::ProviderError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::ProviderId;

/// Sends `request` and decodes a successful JSON body into `T`.
///
/// Transport failures map to `Unavailable`, non-2xx statuses are classified by
/// [`ProviderError::from_status`] with the vendor's own message, and bodies
/// that do not decode map to `MalformedResponse`. An empty body decodes as
/// JSON `null`.
async fn execute_json<T>(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let response = http_client.execute(request).await.map_err(|error| {
        ProviderError::unavailable(format!("{provider} transport error: {}", error.message()))
    })?;

    if !response.is_success() {
        return Err(ProviderError::from_status(
            provider,
            response.status,
            &vendor_detail(&response.body),
        ));
    }

    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };

    serde_json::from_str(body).map_err(|error| {
        ProviderError::malformed_response(format!("{provider} response could not be decoded: {error}"))
    })
}

/// Vendor error text: the JSON `message`/`error` field when present, the raw
/// body otherwise.
fn vendor_detail(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::from("<empty body>");
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| trimmed.to_owned())
}
