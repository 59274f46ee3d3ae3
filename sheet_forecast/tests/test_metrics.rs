use assert_approx_eq::assert_approx_eq;
use rstest::rstest;
use sheet_forecast::metrics::{
    evaluate_forecast, mean_absolute_error, mean_absolute_percentage_error, mean_squared_error,
    root_mean_squared_error, symmetric_mean_absolute_percentage_error,
};
use sheet_forecast::{ForecastError, ForecastResult};

#[test]
fn test_mape_reference_values() {
    let actual = [3.0, -0.5, 2.0, 7.0];
    let predicted = [2.5, 0.0, 2.0, 8.0];

    let mape = mean_absolute_percentage_error(&actual, &predicted).unwrap();
    assert_approx_eq!(mape, 0.3273809523809524, 1e-12);
}

#[test]
fn test_mape_is_a_fraction() {
    let actual = [100.0, 200.0];
    let predicted = [110.0, 180.0];

    // 10% and 10%
    let mape = mean_absolute_percentage_error(&actual, &predicted).unwrap();
    assert_approx_eq!(mape, 0.1, 1e-12);
}

#[test]
fn test_mape_zero_actual_uses_epsilon() {
    let mape = mean_absolute_percentage_error(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
    assert!(mape.is_finite());
    assert_approx_eq!(mape, 0.5 / f64::EPSILON, 1.0);

    let perfect = mean_absolute_percentage_error(&[0.0, 2.0], &[0.0, 2.0]).unwrap();
    assert_eq!(perfect, 0.0);
}

#[rstest]
#[case(&[1.0, 2.0], &[1.0])]
#[case(&[], &[])]
#[case(&[1.0, f64::NAN], &[1.0, 2.0])]
#[case(&[1.0, 2.0], &[f64::INFINITY, 2.0])]
fn test_mape_rejects_bad_inputs(#[case] actual: &[f64], #[case] predicted: &[f64]) {
    let result = mean_absolute_percentage_error(actual, predicted);
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[test]
fn test_error_metrics() {
    let actual = [1.0, 2.0, 3.0, 4.0];
    let predicted = [2.0, 2.0, 1.0, 4.0];

    assert_approx_eq!(mean_absolute_error(&actual, &predicted).unwrap(), 0.75);
    assert_approx_eq!(mean_squared_error(&actual, &predicted).unwrap(), 1.25);
    assert_approx_eq!(root_mean_squared_error(&actual, &predicted).unwrap(), 1.25f64.sqrt());
}

#[test]
fn test_smape() {
    let smape = symmetric_mean_absolute_percentage_error(&[100.0, 0.0], &[50.0, 0.0]).unwrap();
    // 2 * 50 / 150 for the first pair, zero for the all-zero pair
    assert_approx_eq!(smape, (100.0 / 150.0) / 2.0, 1e-12);
}

#[test]
fn test_evaluate_forecast() {
    let actual = [10.0, 20.0, 30.0];
    let predicted = [11.0, 18.0, 30.0];

    let metrics = evaluate_forecast(&actual, &predicted).unwrap();
    assert_approx_eq!(metrics.mae, 1.0);
    assert_approx_eq!(metrics.mse, 5.0 / 3.0);
    assert_approx_eq!(metrics.mape, (0.1 + 0.1) / 3.0, 1e-12);

    let display = metrics.to_string();
    assert!(display.contains("MAPE"));
    assert!(display.contains("6.6667%"));
}

#[test]
fn test_forecast_result_helpers() {
    let forecast = ForecastResult::new(vec![2.0, 4.0], 2).unwrap();
    assert_eq!(forecast.horizons(), 2);
    assert_approx_eq!(forecast.mean_absolute_error(&[1.0, 5.0]).unwrap(), 1.0);
    assert_approx_eq!(forecast.mean_absolute_percentage_error(&[1.0, 5.0]).unwrap(), 0.6);

    assert!(ForecastResult::new(vec![1.0], 2).is_err());
}
