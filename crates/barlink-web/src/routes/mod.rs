pub mod alpaca;
pub mod finnhub;
pub mod meta;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use crate::ApiError;

/// Unwraps a query extraction, reporting malformed parameters in the
/// service's own error shape instead of axum's plain-text rejection.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))
}
