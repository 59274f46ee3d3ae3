//! # Sheet Forecast
//!
//! Forecast accuracy for time series kept in spreadsheets.
//!
//! ## Features
//!
//! - Worksheet access through the Google Sheets API, CSV exports, or memory
//! - Header-keyed tables with best-effort numeric coercion
//! - ARIMA and ARIMAX (regression with ARIMA errors) models
//! - MAPE and related accuracy metrics
//! - A per-sheet analysis that holds out the last 30 rows and scores both models
//!
//! ## Quick Start
//!
//! ```rust
//! use sheet_forecast::analysis::{self, AnalysisConfig};
//! use sheet_forecast::sheets::InMemorySheets;
//!
//! let source = InMemorySheets::new()
//!     .with_str_sheet("Data", &[&["Date", "value"], &["2024-01-01", "1"]]);
//!
//! let report = analysis::run(&source, &AnalysisConfig::default())?;
//! assert!(report.is_empty());
//! # Ok::<(), sheet_forecast::ForecastError>(())
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod sheets;

// Re-export commonly used types
pub use crate::analysis::{AnalysisConfig, AnalysisReport};
pub use crate::data::SheetTable;
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ArimaOrder, ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::sheets::SheetSource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
