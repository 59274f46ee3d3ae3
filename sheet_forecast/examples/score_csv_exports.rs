use sheet_forecast::analysis::{self, AnalysisConfig, TEST_WINDOW};
use sheet_forecast::metrics::evaluate_forecast;
use sheet_forecast::models::Arima;
use sheet_forecast::sheets::{CsvDirectorySource, SheetSource};
use sheet_forecast::{ForecastModel, SheetTable, TrainedForecastModel};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sheet Forecast: Scoring CSV Exports");
    println!("===================================\n");

    // Use the directory given on the command line, or write a sample one
    let dir = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => write_sample_exports()?,
    };

    let source = CsvDirectorySource::new(&dir);
    println!("Worksheets: {:?}\n", source.sheet_titles()?);

    let config = AnalysisConfig::default();
    let report = analysis::run(&source, &config)?;
    println!("MAPE per sheet:");
    println!("{}\n", serde_json::to_string_pretty(&report)?);

    // Look closer at the first modelled sheet
    if let Some(title) = report.sheets().next() {
        let table = SheetTable::from_rows(title, &source.sheet_values(title)?, &config.date_column)?;
        let (train, test) = table.split_tail(TEST_WINDOW)?;

        let trained = Arima::default().train(&train)?;
        let forecast = trained.predict_window(&test)?;
        println!("ARIMA on '{}':", title);
        println!("{}", evaluate_forecast(&test.target()?, forecast.values())?);
    }

    Ok(())
}

fn write_sample_exports() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("sheet_forecast_sample");
    std::fs::create_dir_all(&dir)?;

    let mut sales = String::from("Date,units,price,promo\n");
    let mut units: f64 = 120.0;
    for day in 0..90 {
        let price = 10.0 + (day as f64 / 7.0).sin();
        let promo = if day % 14 < 3 { 1.0 } else { 0.0 };
        units += 0.3 * ((day * 37 % 11) as f64 - 5.0) / 5.0;
        let sold = units - 4.0 * price + 15.0 * promo;
        sales.push_str(&format!("2024-d{:03},{:.2},{:.2},{}\n", day, sold, price, promo));
    }
    std::fs::write(dir.join("Sales.csv"), sales)?;
    std::fs::write(dir.join("Data.csv"), "Date,note\n2024-01-01,raw export\n")?;

    Ok(dir)
}
