//! ARIMA models for sheet time series

use crate::data::SheetTable;
use crate::error::{ForecastError, Result};
use crate::models::{ensure_finite, ArimaOrder, ForecastModel, ForecastResult, TrainedForecastModel};
use series_math::differencing::{difference, integrate};
use series_math::ArmaFit;

/// ARIMA model (AutoRegressive Integrated Moving Average) of the target column
#[derive(Debug, Clone)]
pub struct Arima {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArima {
    /// Name of the model
    name: String,
    /// Fitted process
    process: IntegratedProcess,
}

impl Arima {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_order(ArimaOrder::new(p, d, q))
    }

    /// Create a new ARIMA model from an order
    pub fn with_order(order: ArimaOrder) -> Self {
        Self {
            name: "ARIMA".to_string(),
            order,
        }
    }

    /// Model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fit the model to a plain series
    pub fn fit_series(&self, series: &[f64]) -> Result<TrainedArima> {
        Ok(TrainedArima {
            name: self.name.clone(),
            process: IntegratedProcess::fit(self.order, series)?,
        })
    }
}

impl Default for Arima {
    fn default() -> Self {
        Self::with_order(ArimaOrder::default())
    }
}

impl ForecastModel for Arima {
    type Trained = TrainedArima;

    fn train(&self, data: &SheetTable) -> Result<TrainedArima> {
        let series = data.target()?;
        ensure_finite(&series, "Target column")?;
        self.fit_series(&series)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArima {
    /// Forecast `horizon` periods past the end of the training data
    pub fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = self.process.forecast(horizon)?;
        ForecastResult::new(values, horizon)
    }

    /// Fitted AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        self.process.arma.ar()
    }

    /// Fitted MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        self.process.arma.ma()
    }

    /// Model order
    pub fn order(&self) -> ArimaOrder {
        self.process.order
    }
}

impl TrainedForecastModel for TrainedArima {
    fn predict_window(&self, window: &SheetTable) -> Result<ForecastResult> {
        self.forecast(window.len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// ARMA process fitted to a `d`-times differenced series, together with the
/// history needed to integrate forecasts back to the original scale
#[derive(Debug, Clone)]
pub(crate) struct IntegratedProcess {
    order: ArimaOrder,
    arma: ArmaFit,
    history: Vec<f64>,
}

impl IntegratedProcess {
    pub(crate) fn fit(order: ArimaOrder, series: &[f64]) -> Result<Self> {
        if series.len() < order.min_observations() {
            return Err(ForecastError::ModelError(format!(
                "Insufficient data for ARIMA{}. Need at least {} observations, got {}.",
                order,
                order.min_observations(),
                series.len()
            )));
        }

        let differenced = difference(series, order.d)?;
        // A constant is only estimated for undifferenced series
        let arma = ArmaFit::fit(&differenced, order.p, order.q, order.d == 0)?;

        Ok(Self {
            order,
            arma,
            history: series.to_vec(),
        })
    }

    pub(crate) fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let differenced = difference(&self.history, self.order.d)?;
        let steps = self.arma.forecast(&differenced, horizon)?;
        Ok(integrate(&steps, &self.history, self.order.d)?)
    }
}
