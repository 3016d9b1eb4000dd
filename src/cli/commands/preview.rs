//! Preview command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pivot_core::traits::BarSupplier;
use pivot_core::types::Timeframe;
use pivot_data::CsvBarSupplier;
use pivot_engine::scan_series;

use crate::cli::PreviewArgs;

pub async fn run(args: PreviewArgs, config_path: &Path) -> Result<()> {
    let config = super::load_or_default(config_path)?;

    let data_dir = args
        .data
        .unwrap_or_else(|| PathBuf::from(&config.data.dir));
    let timeframe = Timeframe::from_str(&args.timeframe).map_err(anyhow::Error::msg)?;

    let supplier =
        CsvBarSupplier::new(&data_dir).context("Failed to open the data directory")?;
    let series = supplier
        .fetch_series(&args.symbol, timeframe)
        .await?
        .with_context(|| format!("No data for {} {}", args.symbol, timeframe))?;

    let mut engine = config.engine.engine_config();
    if args.no_trend_filter {
        engine.use_trend_filter = false;
    }
    let rows = scan_series(&series, &engine)?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => {
            println!(
                "{:<12} {:>6} {:>10} {:>10} {:>9}",
                "date", "signal", "buy_level", "stop_level", "position"
            );
            for row in &rows {
                println!(
                    "{:<12} {:>6} {:>10} {:>10} {:>9}",
                    row.date.to_string(),
                    row.signal.to_string(),
                    format_level(row.buy_level),
                    format_level(row.stop_level),
                    if row.in_position { "long" } else { "flat" }
                );
            }
        }
    }

    Ok(())
}

fn format_level(level: Option<f64>) -> String {
    match level {
        Some(value) => format!("{:.2}", value),
        None => "-".to_string(),
    }
}
