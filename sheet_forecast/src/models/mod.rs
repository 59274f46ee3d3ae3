//! Forecasting models for sheet tables

use crate::data::SheetTable;
use crate::error::{ForecastError, Result};
use crate::metrics;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Order (p, d, q) of an ARIMA process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Smallest training length that leaves one differenced observation.
    ///
    /// Shorter AR fits drop the lags the sample cannot identify, so only the
    /// differencing itself bounds the length.
    pub fn min_observations(&self) -> usize {
        self.d + 1
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 5, d: 1, q: 0 }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self { values, horizons })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Calculate mean absolute error between forecast and actual values
    pub fn mean_absolute_error(&self, actual: &[f64]) -> Result<f64> {
        metrics::mean_absolute_error(actual, &self.values)
    }

    /// Calculate MAPE (as a fraction) between forecast and actual values
    pub fn mean_absolute_percentage_error(&self, actual: &[f64]) -> Result<f64> {
        metrics::mean_absolute_percentage_error(actual, &self.values)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict the rows of `window`, which directly follow the training rows.
    ///
    /// Models with exogenous regressors read them from `window`; the target
    /// column of `window` is never used.
    fn predict_window(&self, window: &SheetTable) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a sheet table
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the training rows of a table
    fn train(&self, data: &SheetTable) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Reject series with missing or infinite values before estimation
pub(crate) fn ensure_finite(values: &[f64], what: &str) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::DataError(format!(
            "{} contains missing or non-finite values",
            what
        )));
    }
    Ok(())
}

pub mod arima;
pub mod arimax;

pub use arima::{Arima, TrainedArima};
pub use arimax::{Arimax, TrainedArimax};
