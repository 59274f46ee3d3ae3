//! Per-sheet forecast accuracy analysis
//!
//! Loads every relevant worksheet, holds out the trailing test window, fits
//! ARIMA and ARIMAX on the rest and scores both with MAPE. Failures are
//! contained: a sheet that cannot be loaded is skipped, and a model that
//! cannot be fitted only loses its own score.

use crate::data::{SheetTable, DEFAULT_DATE_COLUMN};
use crate::error::{ForecastError, Result};
use crate::metrics::mean_absolute_percentage_error;
use crate::models::{ArimaOrder, Arima, Arimax, ForecastModel, TrainedForecastModel};
use crate::sheets::SheetSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Worksheets that never hold a series to model
pub const DEFAULT_EXCLUDED_SHEETS: [&str; 2] = ["Data", "CorrelationResults"];

/// Rows held out at the end of every table for scoring
pub const TEST_WINDOW: usize = 30;

/// Tables shorter than this are not modelled
pub const MIN_ROWS: usize = 30;

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Worksheet titles to ignore on top of [`DEFAULT_EXCLUDED_SHEETS`]
    pub excluded_sheets: Vec<String>,
    /// Header of the column kept as text
    pub date_column: String,
    /// Order shared by both models
    pub order: ArimaOrder,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            excluded_sheets: Vec::new(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            order: ArimaOrder::default(),
        }
    }
}

impl AnalysisConfig {
    /// Whether a worksheet title is excluded from analysis.
    ///
    /// [`DEFAULT_EXCLUDED_SHEETS`] are always excluded.
    pub fn is_excluded(&self, title: &str) -> bool {
        DEFAULT_EXCLUDED_SHEETS.contains(&title)
            || self.excluded_sheets.iter().any(|excluded| excluded == title)
    }

    /// Check that the settings describe a usable run
    pub fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Date column name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// MAPE per model per sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport(BTreeMap<String, BTreeMap<String, f64>>);

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a model's score for a sheet
    pub fn insert(&mut self, sheet: &str, model: &str, score: f64) {
        self.0
            .entry(sheet.to_string())
            .or_default()
            .insert(model.to_string(), score);
    }

    /// Scores of one sheet
    pub fn sheet(&self, sheet: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(sheet)
    }

    /// Score of one model on one sheet
    pub fn score(&self, sheet: &str, model: &str) -> Option<f64> {
        self.0.get(sheet).and_then(|scores| scores.get(model)).copied()
    }

    /// Names of the sheets with at least one score
    pub fn sheets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.0
    }
}

/// Load every non-excluded worksheet as a table.
///
/// Listing the worksheets must succeed; a worksheet that fails to load or
/// convert is logged and skipped.
pub fn load_tables(source: &dyn SheetSource, config: &AnalysisConfig) -> Result<Vec<SheetTable>> {
    let titles = source.sheet_titles()?;
    info!("Found {} worksheets in {}", titles.len(), source.describe());

    let mut tables = Vec::new();
    for title in titles.iter().filter(|title| !config.is_excluded(title)) {
        let table = source
            .sheet_values(title)
            .and_then(|rows| SheetTable::from_rows(title.as_str(), &rows, &config.date_column));

        match table {
            Ok(table) => {
                info!("Table '{}' created successfully with {} rows", title, table.len());
                tables.push(table);
            }
            Err(e) => warn!("An error occurred while processing sheet '{}': {}", title, e),
        }
    }

    Ok(tables)
}

/// Fit both models on every table and collect their MAPE scores
pub fn generate_results(tables: &[SheetTable], config: &AnalysisConfig) -> AnalysisReport {
    score_tables(
        tables,
        config,
        &Arima::with_order(config.order),
        &Arimax::with_order(config.order),
    )
}

/// Score every eligible table with two models, each independently of the
/// other. Scores are keyed by the models' names.
pub fn score_tables<A, B>(
    tables: &[SheetTable],
    config: &AnalysisConfig,
    first: &A,
    second: &B,
) -> AnalysisReport
where
    A: ForecastModel,
    B: ForecastModel,
{
    let mut report = AnalysisReport::new();

    for table in tables {
        if config.is_excluded(table.name()) {
            continue;
        }
        if table.len() < MIN_ROWS {
            warn!(
                "Skipping sheet '{}' due to insufficient data ({} rows)",
                table.name(),
                table.len()
            );
            continue;
        }

        let (train, test) = match table.split_tail(TEST_WINDOW) {
            Ok(split) => split,
            Err(e) => {
                warn!("An error occurred while processing sheet '{}': {}", table.name(), e);
                continue;
            }
        };

        let outcomes = [
            (first.name(), score_model(first, &train, &test)),
            (second.name(), score_model(second, &train, &test)),
        ];
        for (name, outcome) in outcomes {
            match outcome {
                Ok(mape) => {
                    info!("Sheet '{}': {} MAPE = {}", table.name(), name, mape);
                    report.insert(table.name(), name, mape);
                }
                Err(e) => warn!("Error fitting {} model for sheet '{}': {}", name, table.name(), e),
            }
        }
    }

    report
}

/// Train on `train`, predict the rows of `test` and score against its target
fn score_model<M: ForecastModel>(model: &M, train: &SheetTable, test: &SheetTable) -> Result<f64> {
    let actual = test.target()?;
    let trained = model.train(train)?;
    let forecast = trained.predict_window(test)?;
    mean_absolute_percentage_error(&actual, forecast.values())
}

/// Load the tables of `source` and score them
pub fn run(source: &dyn SheetSource, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let tables = load_tables(source, config)?;
    Ok(generate_results(&tables, config))
}
