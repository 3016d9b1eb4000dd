//! Run command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use pivot_core::types::Timeframe;
use pivot_data::CsvBarSupplier;
use pivot_runner::{BatchDriver, DriverConfig};
use pivot_sink::CsvSink;

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config = super::load_or_default(config_path)?;

    let data_dir = args
        .data
        .unwrap_or_else(|| PathBuf::from(&config.data.dir));
    let out_path = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.output.path));

    let supplier =
        CsvBarSupplier::new(&data_dir).context("Failed to open the data directory")?;

    let pairs = if args.symbols.is_empty() {
        let discovered = supplier
            .discover_pairs()
            .context("Failed to enumerate pairs from the data directory")?;
        info!(
            pairs = discovered.len(),
            dir = %data_dir.display(),
            "discovered pairs from data directory"
        );
        discovered
    } else {
        let mut timeframes = Vec::new();
        for raw in &args.timeframes {
            timeframes.push(Timeframe::from_str(raw).map_err(anyhow::Error::msg)?);
        }
        let mut pairs = Vec::new();
        for symbol in &args.symbols {
            for timeframe in &timeframes {
                pairs.push((symbol.clone(), *timeframe));
            }
        }
        pairs
    };

    if pairs.is_empty() {
        anyhow::bail!(
            "No (symbol, timeframe) pairs to process; provide --symbols or put CSV files in {}",
            data_dir.display()
        );
    }

    let mut engine = config.engine.engine_config();
    if args.no_trend_filter {
        engine.use_trend_filter = false;
    }
    let driver_config = DriverConfig {
        engine,
        minimum_bars_required: config.engine.minimum_bars_required,
        workers: args.workers.unwrap_or(config.runner.workers),
    };

    let sink = Arc::new(CsvSink::new(&out_path).context("Failed to open the output file")?);
    let driver = BatchDriver::new(driver_config, Arc::new(supplier), sink);

    // Ctrl-C stops pairs that have not started; in-flight pairs finish.
    let cancel = driver.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancellation requested; letting in-flight pairs finish");
            cancel.cancel();
        }
    });

    let report = driver.run(&pairs).await;

    match args.output.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => println!("{}", report.summary()),
    }
    info!(path = %out_path.display(), "signal rows written");

    Ok(())
}
