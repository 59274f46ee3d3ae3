//! API route handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sheet_forecast::{analysis, AnalysisReport, ForecastError};
use tracing::{error, info};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/get_map_value", get(get_map_value))
}

/// Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Ok!" }))
}

/// Load every worksheet, fit both models and report their MAPE per sheet
pub async fn get_map_value(
    State(AppState {
        open_source,
        config,
    }): State<AppState>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = tokio::task::spawn_blocking(move || {
        let source = open_source()?;
        analysis::run(source.as_ref(), &config)
    })
    .await
    .map_err(|e| AppError::internal(format!("Analysis task failed: {}", e)))??;

    info!("Analysis finished with scores for {} sheets", report.len());
    Ok(Json(report))
}

/// Structured JSON error response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn internal(msg: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg,
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let status = match err {
            ForecastError::AuthError(_) | ForecastError::HttpError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        error!("Request failed with {}: {}", self.status, self.message);
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}
