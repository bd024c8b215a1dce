use barlink_core::{ConfigError, FetchError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Fetch(FetchError::BadRequest(_)) => 2,
            Self::Fetch(FetchError::Upstream(_)) => 3,
            Self::Serialization(_) => 4,
            Self::Config(_) => 10,
        }
    }
}
