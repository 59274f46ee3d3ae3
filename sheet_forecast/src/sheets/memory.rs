//! In-memory worksheets

use crate::error::{ForecastError, Result};
use crate::sheets::SheetSource;

/// Worksheets held in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemorySheets {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet
    pub fn with_sheet(mut self, title: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.sheets.push((title.into(), rows));
        self
    }

    /// Add a worksheet from string slices
    pub fn with_str_sheet(self, title: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.with_sheet(title, rows)
    }
}

impl SheetSource for InMemorySheets {
    fn sheet_titles(&self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|(title, _)| title.clone()).collect())
    }

    fn sheet_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        self.sheets
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| ForecastError::DataError(format!("Worksheet '{}' not found", title)))
    }

    fn describe(&self) -> String {
        format!("{} in-memory worksheets", self.sheets.len())
    }
}
