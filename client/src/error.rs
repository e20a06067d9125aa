//! Error handling for the FarmFlow client
//!
//! Prediction outcomes use [`shared::PredictionError`]; this type covers the
//! host concerns around them: configuration, local storage and HTTP setup.

use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Weather service unavailable: {0}")]
    WeatherServiceUnavailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
