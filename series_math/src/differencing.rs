//! Differencing and integration of time series

use crate::{MathError, Result};

/// Apply first differences `d` times.
///
/// Each pass shortens the series by one observation.
pub fn difference(values: &[f64], d: usize) -> Result<Vec<f64>> {
    if values.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Cannot difference {} observations {} times",
            values.len(),
            d
        )));
    }

    let mut current = values.to_vec();
    for _ in 0..d {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(current)
}

/// Undo `d` rounds of differencing for values that continue `history`.
///
/// `forecast` holds values on the `d`-times differenced scale that follow the
/// last observation of `history`; the result is on the original scale.
pub fn integrate(forecast: &[f64], history: &[f64], d: usize) -> Result<Vec<f64>> {
    if d == 0 {
        return Ok(forecast.to_vec());
    }
    if history.len() < d {
        return Err(MathError::InsufficientData(format!(
            "Integrating {} times needs at least {} historical observations, got {}",
            d,
            d,
            history.len()
        )));
    }

    // Last observation of the series at every differencing level 0..d-1
    let mut anchors = Vec::with_capacity(d);
    let mut level = history.to_vec();
    for _ in 0..d {
        anchors.push(level[level.len() - 1]);
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let mut current = forecast.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut last = anchor;
        for value in current.iter_mut() {
            last += *value;
            *value = last;
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let diffed = difference(&[1.0, 4.0, 9.0, 16.0], 1).unwrap();
        assert_eq!(diffed, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_second_difference() {
        let diffed = difference(&[1.0, 4.0, 9.0, 16.0], 2).unwrap();
        assert_eq!(diffed, vec![2.0, 2.0]);
    }

    #[test]
    fn test_difference_too_short() {
        assert!(difference(&[1.0], 1).is_err());
        assert_eq!(difference(&[1.0], 0).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_integrate_inverts_difference() {
        let series = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0];
        let (history, future) = series.split_at(4);

        for d in 1..=2 {
            let full = difference(&series, d).unwrap();
            let tail = &full[full.len() - future.len()..];
            let restored = integrate(tail, history, d).unwrap();
            for (r, f) in restored.iter().zip(future) {
                assert!((r - f).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_integrate_without_differencing() {
        assert_eq!(integrate(&[1.5, 2.5], &[], 0).unwrap(), vec![1.5, 2.5]);
    }
}
