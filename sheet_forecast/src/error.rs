//! Error types for the sheet_forecast crate

use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the sheet_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to sheet contents or table conversion
    #[error("Data error: {0}")]
    DataError(String),

    /// Error raised while fitting or predicting with a model
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric estimation routines
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error obtaining spreadsheet API credentials or tokens
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error talking to the spreadsheet API
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error reading CSV sheets
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::HttpError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ForecastError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ForecastError::AuthError(err.to_string())
    }
}
