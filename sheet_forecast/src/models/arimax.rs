//! ARIMAX: regression on exogenous columns with ARIMA errors
//!
//! The target is modelled as `y_t = x_t·β + u_t` where `u_t` follows an
//! ARIMA(p, d, q) process. β is estimated by least squares on the
//! `d`-times differenced target and regressors, then the implied error series
//! is fitted as an ARIMA process. Predictions combine the window's own
//! regressor values with the forecast errors.

use crate::data::SheetTable;
use crate::error::{ForecastError, Result};
use crate::models::arima::IntegratedProcess;
use crate::models::{ensure_finite, ArimaOrder, ForecastModel, ForecastResult, TrainedForecastModel};
use series_math::differencing::difference;
use series_math::regression::{dot, stable_least_squares};
use tracing::debug;

/// ARIMA model of the target column with every later column as a regressor
#[derive(Debug, Clone)]
pub struct Arimax {
    /// Name of the model
    name: String,
    /// Order of the error process
    order: ArimaOrder,
}

/// Trained ARIMAX model
#[derive(Debug, Clone)]
pub struct TrainedArimax {
    /// Name of the model
    name: String,
    /// Regressor names, in coefficient order
    regressors: Vec<String>,
    /// Regression coefficients
    beta: Vec<f64>,
    /// ARIMA process of the regression errors
    errors: IntegratedProcess,
}

impl Arimax {
    /// Create a new ARIMAX model
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    /// Create a new ARIMAX model from an order
    pub fn with_order(order: ArimaOrder) -> Self {
        Self {
            name: "ARIMAX".to_string(),
            order,
        }
    }

    /// Order of the error process
    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl Default for Arimax {
    fn default() -> Self {
        Self::with_order(ArimaOrder::default())
    }
}

impl ForecastModel for Arimax {
    type Trained = TrainedArimax;

    fn train(&self, data: &SheetTable) -> Result<TrainedArimax> {
        let target = data.target()?;
        ensure_finite(&target, "Target column")?;

        let regressors = data.exogenous_names();
        if regressors.is_empty() {
            return Err(ForecastError::ModelError(format!(
                "Sheet '{}' has no exogenous columns",
                data.name()
            )));
        }
        let exog = data.exogenous()?;
        for (name, column) in regressors.iter().zip(&exog) {
            ensure_finite(column, &format!("Exogenous column '{}'", name))?;
        }

        if target.len() < self.order.min_observations() {
            return Err(ForecastError::ModelError(format!(
                "Insufficient data for ARIMAX{}. Need at least {} observations, got {}.",
                self.order,
                self.order.min_observations(),
                target.len()
            )));
        }

        let d = self.order.d;
        let target_diff = difference(&target, d)?;
        let exog_diff = exog
            .iter()
            .map(|column| difference(column, d))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let rows: Vec<Vec<f64>> = (0..target_diff.len())
            .map(|t| exog_diff.iter().map(|column| column[t]).collect())
            .collect();
        let beta = stable_least_squares(&rows, &target_diff, regressors.len())?;
        debug!("ARIMAX regression coefficients for '{}': {:?}", data.name(), beta);

        let residuals: Vec<f64> = (0..target.len())
            .map(|t| {
                let row: Vec<f64> = exog.iter().map(|column| column[t]).collect();
                target[t] - dot(&row, &beta)
            })
            .collect();

        Ok(TrainedArimax {
            name: self.name.clone(),
            regressors,
            beta,
            errors: IntegratedProcess::fit(self.order, &residuals)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimax {
    /// Regression coefficients, one per regressor
    pub fn coefficients(&self) -> &[f64] {
        &self.beta
    }

    /// Regressor names in coefficient order
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }
}

impl TrainedForecastModel for TrainedArimax {
    fn predict_window(&self, window: &SheetTable) -> Result<ForecastResult> {
        let exog = window.exogenous()?;
        if exog.len() != self.beta.len() {
            return Err(ForecastError::ModelError(format!(
                "Model was trained with {} regressors but the window has {}",
                self.beta.len(),
                exog.len()
            )));
        }
        for (name, column) in self.regressors.iter().zip(&exog) {
            ensure_finite(column, &format!("Exogenous column '{}'", name))?;
        }

        let horizon = window.len();
        let errors = self.errors.forecast(horizon)?;
        let values = (0..horizon)
            .map(|h| {
                let row: Vec<f64> = exog.iter().map(|column| column[h]).collect();
                dot(&row, &self.beta) + errors[h]
            })
            .collect();

        ForecastResult::new(values, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
