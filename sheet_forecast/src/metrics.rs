//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use serde::Serialize;

fn check_inputs(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::ValidationError(format!(
            "Actual ({}) and predicted ({}) values must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.iter().chain(predicted).any(|v| !v.is_finite()) {
        return Err(ForecastError::ValidationError(
            "Actual and predicted values must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Mean Absolute Percentage Error, as a fraction.
///
/// Each absolute error is divided by `max(|actual|, f64::EPSILON)`, so zero
/// actual values yield very large rather than infinite contributions.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a - p).abs() / a.abs().max(f64::EPSILON))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Ok(sum / actual.len() as f64)
}

/// Mean Squared Error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Symmetric Mean Absolute Percentage Error, as a fraction in [0, 2]
pub fn symmetric_mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            let denominator = a.abs() + p.abs();
            if denominator == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denominator
            }
        })
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Evaluate forecast accuracy against actual values
pub fn evaluate_forecast(actual: &[f64], predicted: &[f64]) -> Result<ForecastMetrics> {
    Ok(ForecastMetrics {
        mae: mean_absolute_error(actual, predicted)?,
        mse: mean_squared_error(actual, predicted)?,
        rmse: root_mean_squared_error(actual, predicted)?,
        mape: mean_absolute_percentage_error(actual, predicted)?,
        smape: symmetric_mean_absolute_percentage_error(actual, predicted)?,
    })
}

/// Forecast performance metrics
#[derive(Debug, Clone, Serialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (fraction)
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error (fraction)
    pub smape: f64,
}

impl std::fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics:")?;
        writeln!(f, "  MAE:     {:.4}", self.mae)?;
        writeln!(f, "  MSE:     {:.4}", self.mse)?;
        writeln!(f, "  RMSE:    {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:    {:.4}%", self.mape * 100.0)?;
        writeln!(f, "  SMAPE:   {:.4}%", self.smape * 100.0)?;
        Ok(())
    }
}
