use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use forecast_server::{app, AppState};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sheet_forecast::sheets::{InMemorySheets, SheetSource};
use sheet_forecast::{AnalysisConfig, ForecastError};
use tower::ServiceExt;

/// Worksheet whose target follows a noisy driver column
fn driven_sheet(n: usize) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(29);
    let noise = Normal::new(0.0, 0.3).unwrap();

    let mut rows = vec![vec!["Date".to_string(), "revenue".to_string(), "visits".to_string()]];
    let mut visits = 200.0;
    for t in 0..n {
        visits += noise.sample(&mut rng);
        let revenue = 1.5 * visits + 40.0 + noise.sample(&mut rng);
        rows.push(vec![
            format!("day {}", t),
            format!("{:.3}", revenue),
            format!("{:.3}", visits),
        ]);
    }
    rows
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn failing_state(error: fn() -> ForecastError) -> AppState {
    AppState::new(
        Arc::new(move || -> sheet_forecast::Result<Box<dyn SheetSource>> { Err(error()) }),
        AnalysisConfig::default(),
    )
}

#[tokio::test]
async fn test_health() {
    let state = AppState::with_source(InMemorySheets::new(), AnalysisConfig::default());
    let (status, body) = get_json(state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "Ok!" }));
}

#[tokio::test]
async fn test_get_map_value() {
    let source = InMemorySheets::new()
        .with_sheet("Data", driven_sheet(60))
        .with_sheet("Traffic", driven_sheet(60))
        .with_sheet("CorrelationResults", driven_sheet(60))
        .with_sheet("Pilot", driven_sheet(12));
    let state = AppState::with_source(source, AnalysisConfig::default());

    let (status, body) = get_json(state, "/get_map_value").await;
    assert_eq!(status, StatusCode::OK);

    let sheets = body.as_object().unwrap();
    assert_eq!(sheets.len(), 1);
    assert!(body["Traffic"]["ARIMA"].is_f64());
    assert!(body["Traffic"]["ARIMAX"].is_f64());
}

#[tokio::test]
async fn test_get_map_value_empty_spreadsheet() {
    let state = AppState::with_source(InMemorySheets::new(), AnalysisConfig::default());
    let (status, body) = get_json(state, "/get_map_value").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_spreadsheet_api_failure_is_bad_gateway() {
    let state = failing_state(|| ForecastError::AuthError("invalid_grant".to_string()));
    let (status, body) = get_json(state, "/get_map_value").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("invalid_grant"));
}

#[tokio::test]
async fn test_local_failure_is_internal_error() {
    let state = failing_state(|| ForecastError::DataError("no such directory".to_string()));
    let (status, body) = get_json(state, "/get_map_value").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no such directory"));
}

#[tokio::test]
async fn test_unknown_route() {
    let state = AppState::with_source(InMemorySheets::new(), AnalysisConfig::default());
    let response = app(state)
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
