use std::sync::Arc;

use sheet_forecast::{AnalysisConfig, SheetSource};

/// Opens a fresh spreadsheet connection for one analysis run
pub type SourceOpener =
    Arc<dyn Fn() -> sheet_forecast::Result<Box<dyn SheetSource>> + Send + Sync>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub open_source: SourceOpener,
    pub config: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(open_source: SourceOpener, config: AnalysisConfig) -> Self {
        Self {
            open_source,
            config: Arc::new(config),
        }
    }

    /// State that hands out clones of an already-built source
    pub fn with_source<S>(source: S, config: AnalysisConfig) -> Self
    where
        S: SheetSource + Clone + 'static,
    {
        Self::new(
            Arc::new(move || Ok(Box::new(source.clone()) as Box<dyn SheetSource>)),
            config,
        )
    }
}
