//! # forecast_server
//!
//! HTTP service that scores ARIMA and ARIMAX forecasts for every worksheet of
//! a spreadsheet.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod routes;
pub mod state;

pub use config::Args;
pub use state::{AppState, SourceOpener};

/// Build the application router
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
