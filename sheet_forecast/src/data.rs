//! Sheet tables: header-keyed time series converted from raw worksheet cells

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Header of the column that is never coerced to numbers
pub const DEFAULT_DATE_COLUMN: &str = "Date";

/// Position of the forecast target (the column after the date column)
const TARGET_POSITION: usize = 1;

/// Position of the first exogenous regressor
const FIRST_EXOGENOUS_POSITION: usize = 2;

/// One worksheet as a table of rows ordered by time
#[derive(Debug, Clone)]
pub struct SheetTable {
    /// Worksheet title
    name: String,
    /// Data frame holding one series per header
    df: DataFrame,
    /// Name of the date column
    date_column: String,
}

impl SheetTable {
    /// Build a table from raw worksheet cells.
    ///
    /// The first row is the header. Every column except `date_column` is
    /// coerced to `f64` when all of its cells parse; otherwise the column is
    /// kept as text and a warning is logged.
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<String>], date_column: &str) -> Result<Self> {
        let name = name.into();
        let header = rows.first().ok_or_else(|| {
            ForecastError::DataError(format!("Sheet '{}' has no header row", name))
        })?;
        if header.is_empty() {
            return Err(ForecastError::DataError(format!(
                "Sheet '{}' has an empty header row",
                name
            )));
        }

        let headers = unique_headers(header);
        let width = headers.len();
        let records: Vec<Vec<&str>> = rows[1..]
            .iter()
            .map(|row| {
                (0..width)
                    .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
                    .collect()
            })
            .collect();

        let mut columns = Vec::with_capacity(width);
        for (idx, header) in headers.iter().enumerate() {
            let cells: Vec<&str> = records.iter().map(|record| record[idx]).collect();

            if header == date_column {
                columns.push(Series::new(header, cells));
                continue;
            }

            match coerce_column(&cells) {
                Some(values) => columns.push(Series::new(header, values)),
                None => {
                    warn!(
                        "Could not convert column '{}' to float in sheet '{}'. Keeping it as text.",
                        header, name
                    );
                    columns.push(Series::new(header, cells));
                }
            }
        }

        let df = DataFrame::new(columns)?;
        debug!(
            "Table '{}' created with {} rows and {} columns",
            name,
            df.height(),
            df.width()
        );

        Ok(Self {
            name,
            df,
            date_column: date_column.to_string(),
        })
    }

    /// Worksheet title
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the date column name
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column names in header order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Names of the columns that were coerced to numbers
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|s| s.dtype() == &DataType::Float64)
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Split into a training prefix and the last `window` rows
    pub fn split_tail(&self, window: usize) -> Result<(SheetTable, SheetTable)> {
        let height = self.df.height();
        if window > height {
            return Err(ForecastError::ValidationError(format!(
                "Sheet '{}' has {} rows, fewer than the {}-row test window",
                self.name, height, window
            )));
        }

        let train_len = height - window;
        let train = self.with_frame(self.df.slice(0, train_len));
        let test = self.with_frame(self.df.slice(train_len as i64, window));
        Ok((train, test))
    }

    fn with_frame(&self, df: DataFrame) -> Self {
        Self {
            name: self.name.clone(),
            df,
            date_column: self.date_column.clone(),
        }
    }

    /// Name of the forecast target column
    pub fn target_name(&self) -> Option<&str> {
        self.df
            .get_columns()
            .get(TARGET_POSITION)
            .map(|s| s.name())
    }

    /// Values of the forecast target column
    pub fn target(&self) -> Result<Vec<f64>> {
        self.column_as_f64(TARGET_POSITION)
    }

    /// Names of the exogenous regressor columns
    pub fn exogenous_names(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .skip(FIRST_EXOGENOUS_POSITION)
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Values of every exogenous regressor, one vector per column
    pub fn exogenous(&self) -> Result<Vec<Vec<f64>>> {
        (FIRST_EXOGENOUS_POSITION..self.df.width())
            .map(|position| self.column_as_f64(position))
            .collect()
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(&self, position: usize) -> Result<Vec<f64>> {
        let col = self.df.get_columns().get(position).ok_or_else(|| {
            ForecastError::DataError(format!(
                "Sheet '{}' has no column at position {}",
                self.name, position
            ))
        })?;

        match col.dtype() {
            DataType::Float64 => Ok(col
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect()),
            _ => Err(ForecastError::DataError(format!(
                "Column '{}' in sheet '{}' is not numeric",
                col.name(),
                self.name
            ))),
        }
    }
}

/// Parse every cell as a float, or give up on the whole column
fn coerce_column(cells: &[&str]) -> Option<Vec<f64>> {
    cells.iter().map(|cell| cell.trim().parse::<f64>().ok()).collect()
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
fn unique_headers(header: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for raw in header {
        let mut name = raw.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{}.{}", raw, count);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }

    names
}
