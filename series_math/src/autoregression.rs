//! Conditional least squares estimation of ARMA(p, q) processes
//!
//! Pure autoregressions are fitted by regressing each observation on its `p`
//! predecessors. Short samples fit only as many lags as they identify, and the
//! remaining coefficients are zero. When moving-average terms are requested the two-stage
//! Hannan–Rissanen procedure is used: a long autoregression supplies
//! innovation estimates, then the series is regressed on its own lags and the
//! lagged innovations.

use crate::regression::stable_least_squares;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted ARMA(p, q) process
///
/// `w_t = c + Σ φ_i w_{t-i} + Σ θ_j e_{t-j} + e_t`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmaFit {
    ar: Vec<f64>,
    ma: Vec<f64>,
    constant: f64,
    sigma2: f64,
}

impl ArmaFit {
    /// Build a process from known coefficients
    pub fn from_parts(ar: Vec<f64>, ma: Vec<f64>, constant: f64) -> Self {
        Self {
            ar,
            ma,
            constant,
            sigma2: 0.0,
        }
    }

    /// Estimate an ARMA(p, q) process from `series`
    pub fn fit(series: &[f64], p: usize, q: usize, with_constant: bool) -> Result<Self> {
        if series.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Series contains non-finite values".to_string(),
            ));
        }

        let mut fit = if q == 0 {
            Self::fit_autoregression(series, p, with_constant)?
        } else {
            Self::fit_hannan_rissanen(series, p, q, with_constant)?
        };

        let residuals = fit.residuals(series);
        let start = p.min(residuals.len());
        let tail = &residuals[start..];
        fit.sigma2 = if tail.is_empty() {
            0.0
        } else {
            tail.iter().map(|e| e * e).sum::<f64>() / tail.len() as f64
        };

        Ok(fit)
    }

    fn fit_autoregression(series: &[f64], p: usize, with_constant: bool) -> Result<Self> {
        let order = identifiable_order(series.len(), p, with_constant);
        let regressors = order + usize::from(with_constant);
        if regressors == 0 {
            return Ok(Self::from_parts(vec![0.0; p], Vec::new(), 0.0));
        }

        let start = order.min(series.len());
        let mut rows = Vec::with_capacity(series.len() - start);
        let mut target = Vec::with_capacity(series.len() - start);
        for t in start..series.len() {
            let mut row = Vec::with_capacity(regressors);
            if with_constant {
                row.push(1.0);
            }
            row.extend((1..=order).map(|i| series[t - i]));
            rows.push(row);
            target.push(series[t]);
        }

        let beta = stable_least_squares(&rows, &target, regressors)?;
        let (constant, mut ar) = if with_constant {
            (beta[0], beta[1..].to_vec())
        } else {
            (0.0, beta)
        };
        ar.resize(p, 0.0);

        Ok(Self::from_parts(ar, Vec::new(), constant))
    }

    fn fit_hannan_rissanen(series: &[f64], p: usize, q: usize, with_constant: bool) -> Result<Self> {
        let n = series.len();
        let long_order = (p + q).max((n as f64).sqrt() as usize).max(1);
        let regressors = p + q + usize::from(with_constant);

        if n < long_order + q + regressors || n < 2 * long_order + 1 {
            return Err(MathError::InsufficientData(format!(
                "ARMA({},{}) needs more than {} observations",
                p, q, n
            )));
        }

        // Stage 1: long autoregression for innovation estimates
        let long = Self::fit_autoregression(series, long_order, with_constant)?;
        let innovations = long.residuals(series);

        // Stage 2: regress on own lags and lagged innovations
        let start = long_order + q;
        let mut rows = Vec::with_capacity(n - start);
        let mut target = Vec::with_capacity(n - start);
        for t in start..n {
            let mut row = Vec::with_capacity(regressors);
            if with_constant {
                row.push(1.0);
            }
            row.extend((1..=p).map(|i| series[t - i]));
            row.extend((1..=q).map(|j| innovations[t - j]));
            rows.push(row);
            target.push(series[t]);
        }

        let beta = stable_least_squares(&rows, &target, regressors)?;
        let offset = usize::from(with_constant);
        let constant = if with_constant { beta[0] } else { 0.0 };
        let ar = beta[offset..offset + p].to_vec();
        let ma = beta[offset + p..].to_vec();

        Ok(Self::from_parts(ar, ma, constant))
    }

    /// AR coefficients φ_1..φ_p
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients θ_1..θ_q
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Intercept `c`
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Innovation variance estimated from the in-sample residuals
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// One-step-ahead residuals over `series`, conditional on zero
    /// pre-sample innovations. The first `p` residuals are zero.
    pub fn residuals(&self, series: &[f64]) -> Vec<f64> {
        let p = self.ar.len();
        let mut residuals = vec![0.0; series.len()];
        for t in p..series.len() {
            residuals[t] = series[t] - self.predict_next(&series[..t], &residuals[..t]);
        }
        residuals
    }

    fn predict_next(&self, history: &[f64], innovations: &[f64]) -> f64 {
        let t = history.len();
        let ar_part: f64 = self
            .ar
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < t)
            .map(|(i, phi)| phi * history[t - i - 1])
            .sum();
        let ma_part: f64 = self
            .ma
            .iter()
            .enumerate()
            .filter(|(j, _)| *j < t)
            .map(|(j, theta)| theta * innovations[t - j - 1])
            .sum();

        self.constant + ar_part + ma_part
    }

    /// Recursive multi-step forecast continuing `history`.
    ///
    /// Future innovations are set to their expectation of zero. Lags reaching
    /// before the start of `history` contribute nothing.
    pub fn forecast(&self, history: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let mut values = history.to_vec();
        let mut innovations = self.residuals(history);
        for _ in 0..horizon {
            let next = self.predict_next(&values, &innovations);
            values.push(next);
            innovations.push(0.0);
        }

        Ok(values.split_off(history.len()))
    }
}

/// Largest AR order up to `p` that leaves at least two equations per
/// estimated coefficient in a series of `n` observations
fn identifiable_order(n: usize, p: usize, with_constant: bool) -> usize {
    let constant = usize::from(with_constant);
    (0..=p)
        .rev()
        .find(|&order| n >= order + 2 * (order + constant))
        .unwrap_or(0)
}
