//! # Sheet MAPE
//!
//! Umbrella crate for the spreadsheet forecast accuracy workspace.
//!
//! - [`series_math`]: differencing, least squares and ARMA estimation
//! - [`sheet_forecast`]: worksheet tables, ARIMA/ARIMAX models and the per-sheet analysis
//! - [`forecast_server`]: the HTTP service exposing `/get_map_value`
//!
//! ## Example
//!
//! ```
//! use sheet_mape_workspace::sheet_forecast::analysis::{self, AnalysisConfig};
//! use sheet_mape_workspace::sheet_forecast::sheets::InMemorySheets;
//!
//! let source = InMemorySheets::new()
//!     .with_str_sheet("Short", &[&["Date", "value"], &["2024-01-01", "3"]]);
//! let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
//! assert!(report.sheet("Short").is_none());
//! ```

pub use forecast_server;
pub use series_math;
pub use sheet_forecast;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_link() {
        assert_eq!(sheet_forecast::NAME, "sheet_forecast");
        let config = sheet_forecast::AnalysisConfig::default();
        assert!(config.is_excluded("Data"));
        assert_eq!(sheet_forecast::analysis::TEST_WINDOW, 30);
        assert_eq!(forecast_server::config::DEFAULT_SPREADSHEET_ID.len(), 44);
        assert_eq!(series_math::differencing::difference(&[1.0, 4.0], 1).unwrap(), vec![3.0]);
    }
}
