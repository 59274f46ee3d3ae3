use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sheet_forecast::analysis::{self, generate_results, load_tables, score_tables, AnalysisConfig};
use sheet_forecast::models::{Arimax, TrainedArima};
use sheet_forecast::sheets::{InMemorySheets, SheetSource};
use sheet_forecast::{ForecastError, ForecastModel, Result, SheetTable};

/// Worksheet with a date, a target driven by `driver`, and the driver itself
fn driven_sheet(n: usize, seed: u64) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = Normal::new(0.0, 0.3).unwrap();
    let shock = Normal::new(0.0, 0.3).unwrap();

    let mut rows = vec![vec!["Date".to_string(), "sales".to_string(), "driver".to_string()]];
    let mut driver = 50.0;
    for t in 0..n {
        driver += step.sample(&mut rng);
        let sales = 2.0 * driver + 20.0 + shock.sample(&mut rng);
        rows.push(vec![
            format!("2024-{:02}-{:02}", t / 28 + 1, t % 28 + 1),
            format!("{:.4}", sales),
            format!("{:.4}", driver),
        ]);
    }
    rows
}

/// Same as `driven_sheet` with a target that never changes
fn flat_sheet(n: usize, seed: u64) -> Vec<Vec<String>> {
    let mut rows = driven_sheet(n, seed);
    for row in rows.iter_mut().skip(1) {
        row[1] = "100".to_string();
    }
    rows
}

/// ARIMA stand-in whose estimation never converges
#[derive(Debug, Clone)]
struct NonConvergingArima;

impl ForecastModel for NonConvergingArima {
    type Trained = TrainedArima;

    fn train(&self, _data: &SheetTable) -> Result<TrainedArima> {
        Err(ForecastError::ModelError("Estimation did not converge".to_string()))
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}

/// Same as `driven_sheet` with the driver replaced by free text
fn annotated_sheet(n: usize, seed: u64) -> Vec<Vec<String>> {
    let mut rows = driven_sheet(n, seed);
    rows[0][2] = "notes".to_string();
    for row in rows.iter_mut().skip(1) {
        row[2] = "checked".to_string();
    }
    rows
}

/// Source whose worksheet listing always fails
struct Unreachable;

impl SheetSource for Unreachable {
    fn sheet_titles(&self) -> Result<Vec<String>> {
        Err(ForecastError::HttpError("connection refused".to_string()))
    }

    fn sheet_values(&self, _title: &str) -> Result<Vec<Vec<String>>> {
        unreachable!("titles are listed first")
    }

    fn describe(&self) -> String {
        "unreachable spreadsheet".to_string()
    }
}

#[test]
fn test_excluded_sheets_never_reported() {
    let source = InMemorySheets::new()
        .with_sheet("Data", driven_sheet(80, 1))
        .with_sheet("Sales", driven_sheet(80, 2))
        .with_sheet("CorrelationResults", driven_sheet(80, 3));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.sheets().collect::<Vec<_>>(), vec!["Sales"]);
}

#[test]
fn test_both_models_scored() {
    let source = InMemorySheets::new().with_sheet("Sales", driven_sheet(90, 4));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    let arima = report.score("Sales", "ARIMA").unwrap();
    let arimax = report.score("Sales", "ARIMAX").unwrap();
    assert!(arima.is_finite() && arima >= 0.0);
    assert!(arimax.is_finite() && arimax >= 0.0);
    assert_eq!(report.sheet("Sales").unwrap().len(), 2);
}

#[test]
fn test_short_sheets_skipped() {
    let source = InMemorySheets::new()
        .with_sheet("Tiny", driven_sheet(29, 5))
        .with_sheet("Long", driven_sheet(60, 6));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    assert!(report.sheet("Tiny").is_none());
    assert!(report.sheet("Long").is_some());
}

#[test]
fn test_window_sized_sheet_has_no_training_rows() {
    // Exactly 30 rows passes the size check but leaves nothing to train on
    let source = InMemorySheets::new().with_sheet("Exact", driven_sheet(30, 7));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_one_model_failing_keeps_the_other() {
    let source = InMemorySheets::new().with_sheet("Annotated", annotated_sheet(70, 8));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    assert!(report.score("Annotated", "ARIMA").is_some());
    assert!(report.score("Annotated", "ARIMAX").is_none());
}

#[test]
fn test_broken_sheet_does_not_abort_run() {
    let source = InMemorySheets::new()
        .with_sheet("Blank", vec![])
        .with_str_sheet("Words", &[&["Date", "label"], &["2024-01-01", "up"]])
        .with_sheet("Sales", driven_sheet(60, 9));

    let tables = load_tables(&source, &AnalysisConfig::default()).unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Words", "Sales"]);

    let report = generate_results(&tables, &AnalysisConfig::default());
    assert_eq!(report.sheets().collect::<Vec<_>>(), vec!["Sales"]);
}

#[test]
fn test_listing_failure_fails_run() {
    let result = analysis::run(&Unreachable, &AnalysisConfig::default());
    assert!(matches!(result, Err(ForecastError::HttpError(_))));
}

#[test]
fn test_extra_exclusions_keep_defaults() {
    let config = AnalysisConfig {
        excluded_sheets: vec!["Sales".to_string()],
        ..AnalysisConfig::default()
    };
    let source = InMemorySheets::new()
        .with_sheet("Sales", driven_sheet(60, 10))
        .with_sheet("Data", driven_sheet(60, 11))
        .with_sheet("CorrelationResults", driven_sheet(60, 14))
        .with_sheet("Inventory", driven_sheet(60, 15));

    let report = analysis::run(&source, &config).unwrap();
    assert_eq!(report.sheets().collect::<Vec<_>>(), vec!["Inventory"]);
}

#[test]
fn test_default_exclusions_cannot_be_cleared() {
    let config = AnalysisConfig {
        excluded_sheets: Vec::new(),
        ..AnalysisConfig::default()
    };
    assert!(config.is_excluded("Data"));
    assert!(config.is_excluded("CorrelationResults"));

    // Tables built elsewhere are filtered as well
    let tables = vec![SheetTable::from_rows("Data", &driven_sheet(60, 16), "Date").unwrap()];
    assert!(generate_results(&tables, &config).is_empty());
}

#[test]
fn test_short_training_prefix_still_scored() {
    // 40 rows leave a 10-row training prefix
    let source = InMemorySheets::new().with_sheet("Pilot", driven_sheet(40, 17));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    let arima = report.score("Pilot", "ARIMA").unwrap();
    let arimax = report.score("Pilot", "ARIMAX").unwrap();
    assert!(arima.is_finite());
    assert!(arimax.is_finite());
}

#[test]
fn test_flat_target_scores_zero() {
    let source = InMemorySheets::new().with_sheet("Steady", flat_sheet(80, 18));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    assert!(report.score("Steady", "ARIMA").unwrap() < 1e-9);
    assert!(report.score("Steady", "ARIMAX").unwrap() < 1e-9);
}

#[test]
fn test_failed_arima_keeps_arimax() {
    let tables = vec![SheetTable::from_rows("Sales", &driven_sheet(70, 19), "Date").unwrap()];

    let report = score_tables(
        &tables,
        &AnalysisConfig::default(),
        &NonConvergingArima,
        &Arimax::default(),
    );
    assert!(report.score("Sales", "ARIMA").is_none());
    assert!(report.score("Sales", "ARIMAX").is_some());
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalysisConfig {
        date_column: " ".to_string(),
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        analysis::run(&InMemorySheets::new(), &config),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_report_json_shape() {
    let source = InMemorySheets::new()
        .with_sheet("b_sheet", driven_sheet(60, 12))
        .with_sheet("a_sheet", annotated_sheet(60, 13));

    let report = analysis::run(&source, &AnalysisConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let object = json.as_object().unwrap();
    assert_eq!(object.keys().collect::<Vec<_>>(), vec!["a_sheet", "b_sheet"]);
    assert!(json["a_sheet"]["ARIMA"].is_f64());
    assert!(json["a_sheet"].get("ARIMAX").is_none());
    assert!(json["b_sheet"]["ARIMAX"].is_f64());
}
