use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use barlink_core::{FetchError, ProviderError, ProviderErrorKind, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single HTTP handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("bad request: {0}")]
    Validation(#[from] ValidationError),

    #[error("upstream error: {0}")]
    Upstream(#[from] ProviderError),

    #[error("bad request: {0}")]
    InvalidInput(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(FetchError::BadRequest(_)) | Self::Validation(_) | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Fetch(FetchError::Upstream(error)) | Self::Upstream(error) => {
                upstream_status(error)
            }
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(error) => error.code(),
            Self::Validation(_) | Self::InvalidInput(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
            Self::NotConfigured(_) => "not_configured",
        }
    }
}

fn upstream_status(error: &ProviderError) -> StatusCode {
    if error.kind() == ProviderErrorKind::RateLimited {
        StatusCode::TOO_MANY_REQUESTS
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
