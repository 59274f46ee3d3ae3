//! # Series Math
//!
//! Numeric building blocks for fitting ARIMA-style models to short series:
//! differencing and its inverse, ordinary least squares, and conditional
//! least squares ARMA estimation with recursive multi-step forecasting.

use thiserror::Error;

pub mod autoregression;
pub mod differencing;
pub mod regression;

pub use autoregression::ArmaFit;

/// Errors that can occur in series calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
