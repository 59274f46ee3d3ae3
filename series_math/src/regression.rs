//! Ordinary least squares regression

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};

const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Ridge penalty relative to the mean squared regressor norm
const RIDGE_PENALTY: f64 = 1e-6;

/// Solve `target ≈ rows · β` for `β` by ordinary least squares.
///
/// Each entry of `rows` is one observation with the same number of
/// regressors. The normal equations are solved with a Cholesky
/// factorisation, so a rank-deficient design is reported as an error rather
/// than producing an arbitrary solution.
pub fn least_squares(rows: &[Vec<f64>], target: &[f64]) -> Result<Vec<f64>> {
    if rows.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            rows.len(),
            target.len()
        )));
    }

    let k = rows.first().map(|r| r.len()).unwrap_or(0);
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Regression needs at least one regressor".to_string(),
        ));
    }
    if rows.iter().any(|r| r.len() != k) {
        return Err(MathError::InvalidInput(
            "Design rows have differing numbers of regressors".to_string(),
        ));
    }
    if rows.len() < k {
        return Err(MathError::InsufficientData(format!(
            "{} observations cannot identify {} coefficients",
            rows.len(),
            k
        )));
    }

    let x = DMatrix::from_fn(rows.len(), k, |i, j| rows[i][j]);
    let y = DVector::from_column_slice(target);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;

    let scale = xtx.diagonal().max();
    let cholesky = xtx.cholesky().ok_or_else(|| {
        MathError::CalculationError("Design matrix is singular".to_string())
    })?;

    // Pivots that vanish relative to the largest regressor norm mean the
    // columns are collinear up to rounding.
    let smallest_pivot = cholesky.l().diagonal().min();
    if smallest_pivot * smallest_pivot <= scale * SINGULARITY_TOLERANCE {
        return Err(MathError::CalculationError(
            "Design matrix is numerically singular".to_string(),
        ));
    }

    let beta = cholesky.solve(&xty);

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(MathError::CalculationError(
            "Least squares produced non-finite coefficients".to_string(),
        ));
    }

    Ok(beta.iter().copied().collect())
}

/// Solve `target ≈ rows · β` with a small ridge penalty.
///
/// The penalised normal equations are always positive definite, so singular
/// and underdetermined designs still get a finite solution: directions the
/// data cannot identify are shrunk to zero. With no rows at all every
/// coefficient is zero.
pub fn ridge_least_squares(rows: &[Vec<f64>], target: &[f64], width: usize) -> Result<Vec<f64>> {
    if rows.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            rows.len(),
            target.len()
        )));
    }
    if rows.iter().any(|r| r.len() != width) {
        return Err(MathError::InvalidInput(format!(
            "Design rows must all have {} regressors",
            width
        )));
    }
    if rows.is_empty() || width == 0 {
        return Ok(vec![0.0; width]);
    }

    let x = DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j]);
    let y = DVector::from_column_slice(target);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;

    let lambda = RIDGE_PENALTY * (xtx.trace() / width as f64).max(1.0);
    let penalised = xtx + DMatrix::<f64>::identity(width, width) * lambda;
    let beta = penalised
        .cholesky()
        .ok_or_else(|| MathError::CalculationError("Ridge system is not positive definite".to_string()))?
        .solve(&xty);

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(MathError::CalculationError(
            "Ridge regression produced non-finite coefficients".to_string(),
        ));
    }

    Ok(beta.iter().copied().collect())
}

/// Ordinary least squares, falling back to [`ridge_least_squares`] when the
/// design is singular or has fewer rows than `width` regressors
pub fn stable_least_squares(rows: &[Vec<f64>], target: &[f64], width: usize) -> Result<Vec<f64>> {
    if rows.is_empty() || width == 0 {
        return ridge_least_squares(rows, target, width);
    }
    match least_squares(rows, target) {
        Err(MathError::CalculationError(_)) | Err(MathError::InsufficientData(_)) => {
            ridge_least_squares(rows, target, width)
        }
        other => other,
    }
}

/// Inner product of a regressor row and a coefficient vector
pub fn dot(row: &[f64], coefficients: &[f64]) -> f64 {
    row.iter().zip(coefficients).map(|(x, b)| x * b).sum()
}
