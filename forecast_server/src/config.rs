//! Command line and environment configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use sheet_forecast::data::DEFAULT_DATE_COLUMN;
use sheet_forecast::sheets::{
    CsvDirectorySource, Credentials, GoogleSheetsClient, ServiceAccountKey, SheetSource,
};
use sheet_forecast::{AnalysisConfig, ArimaOrder};

use crate::state::SourceOpener;

/// Spreadsheet analysed when none is configured
pub const DEFAULT_SPREADSHEET_ID: &str = "1jnTFKyRtwLc1cK1YXQ3GER_z8dYmpsj0VmB9nih-szQ";

/// Serve per-sheet ARIMA/ARIMAX forecast accuracy for a spreadsheet
#[derive(Debug, Clone, Parser)]
#[command(name = "forecast_server", version, about)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Key of the Google spreadsheet to analyse
    #[arg(long, env = "SPREADSHEET_ID", default_value = DEFAULT_SPREADSHEET_ID)]
    pub spreadsheet_id: String,

    /// Base64-encoded service account JSON key
    #[arg(long, env = "GCP_CREDS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Ready-made OAuth2 access token, used instead of a service account
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Read worksheets from the CSV files of this directory instead
    #[arg(long, env = "CSV_DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Worksheet to skip besides Data and CorrelationResults; repeat for several
    #[arg(long = "exclude", value_name = "SHEET")]
    pub excluded_sheets: Vec<String>,

    /// Header of the date column
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Analysis settings derived from the arguments
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            excluded_sheets: self.excluded_sheets.clone(),
            date_column: self.date_column.clone(),
            order: ArimaOrder::default(),
        }
    }

    /// Build the opener for the configured worksheet source.
    ///
    /// A CSV directory wins over Google credentials; an access token wins
    /// over a service account key.
    pub fn source_opener(&self) -> anyhow::Result<SourceOpener> {
        if let Some(dir) = &self.csv_dir {
            let dir = dir.clone();
            return Ok(Arc::new(move || {
                Ok(Box::new(CsvDirectorySource::new(&dir)) as Box<dyn SheetSource>)
            }));
        }

        let credentials = match (&self.access_token, &self.credentials) {
            (Some(token), _) => Credentials::AccessToken(token.clone()),
            (None, Some(encoded)) => Credentials::ServiceAccount(
                ServiceAccountKey::from_base64(encoded).context("Failed to decode GCP_CREDS")?,
            ),
            (None, None) => bail!(
                "No worksheet source configured: set GCP_CREDS, GOOGLE_ACCESS_TOKEN or CSV_DIR"
            ),
        };

        let spreadsheet_id = self.spreadsheet_id.clone();
        Ok(Arc::new(move || {
            let client = GoogleSheetsClient::new(credentials.clone(), spreadsheet_id.clone())?;
            Ok(Box::new(client) as Box<dyn SheetSource>)
        }))
    }
}
