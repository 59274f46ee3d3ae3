//! Sources of worksheet data
//!
//! A [`SheetSource`] lists worksheet titles and returns each worksheet as raw
//! rows of cell text, header row first. Sources are blocking; async callers
//! should run them on a blocking thread.

use crate::error::Result;

pub mod csv_dir;
pub mod google;
pub mod memory;

pub use csv_dir::CsvDirectorySource;
pub use google::{Credentials, GoogleSheetsClient, ServiceAccountKey};
pub use memory::InMemorySheets;

/// Read-only access to the worksheets of one spreadsheet
pub trait SheetSource: Send + Sync {
    /// Titles of every worksheet, in spreadsheet order
    fn sheet_titles(&self) -> Result<Vec<String>>;

    /// All cell values of a worksheet, row-major, header row first
    fn sheet_values(&self, title: &str) -> Result<Vec<Vec<String>>>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}
