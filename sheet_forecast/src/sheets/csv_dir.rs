//! Worksheets exported as CSV files in a directory

use crate::error::{ForecastError, Result};
use crate::sheets::SheetSource;
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};

/// Every `*.csv` file in a directory is one worksheet titled by its file stem
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn sheet_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", title))
    }
}

impl SheetSource for CsvDirectorySource {
    fn sheet_titles(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext == "csv")
                .unwrap_or(false);
            if !is_csv || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn sheet_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        let path = self.sheet_path(title);
        if !path.is_file() {
            return Err(ForecastError::DataError(format!(
                "Worksheet '{}' not found in {}",
                title,
                self.dir.display()
            )));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("CSV directory {}", self.dir.display())
    }
}
