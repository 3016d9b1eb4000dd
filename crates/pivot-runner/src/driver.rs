//! Batch driver and worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use pivot_core::error::DataError;
use pivot_core::traits::{BarSupplier, ResultSink};
use pivot_core::types::Timeframe;
use pivot_engine::{degenerate_rows, scan_series, EngineConfig};

use crate::report::{BatchReport, PairOutcome, PairStatus};

/// Batch driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Per-series scan configuration
    pub engine: EngineConfig,
    /// Series shorter than this get all-"None" output without a scan
    pub minimum_bars_required: usize,
    /// Maximum number of pairs processed in parallel
    pub workers: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            minimum_bars_required: 0,
            workers: 4,
        }
    }
}

/// Cooperative cancellation flag for a batch run.
///
/// Cancelling stops pairs that have not started yet; in-flight pairs
/// run to completion so no partially computed series reaches the sink.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Batch driver over (symbol, timeframe) pairs.
///
/// Each pair is handed to one worker, which fetches the series, runs
/// the sequential scan with its own ephemeral state, and upserts the
/// rows. No state is shared between pairs except the sink.
pub struct BatchDriver {
    config: DriverConfig,
    supplier: Arc<dyn BarSupplier>,
    sink: Arc<dyn ResultSink>,
    cancel: CancelToken,
}

impl BatchDriver {
    /// Create a new driver.
    pub fn new(
        config: DriverConfig,
        supplier: Arc<dyn BarSupplier>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            config,
            supplier,
            sink,
            cancel: CancelToken::new(),
        }
    }

    /// Get a handle for cancelling the run.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the batch over the given pairs and report the outcome.
    pub async fn run(&self, pairs: &[(String, Timeframe)]) -> BatchReport {
        info!(
            pairs = pairs.len(),
            workers = self.config.workers,
            supplier = self.supplier.name(),
            sink = self.sink.name(),
            "starting signal batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks = JoinSet::new();
        let mut outcomes = Vec::with_capacity(pairs.len());

        for (symbol, timeframe) in pairs.iter().cloned() {
            // Checked between pairs only: an in-flight pair finishes.
            if self.cancel.is_cancelled() {
                warn!(symbol, timeframe = %timeframe, "batch cancelled before pair started");
                outcomes.push(PairOutcome {
                    symbol,
                    timeframe,
                    status: PairStatus::Cancelled,
                });
                continue;
            }

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed, cannot happen
            };
            let supplier = Arc::clone(&self.supplier);
            let sink = Arc::clone(&self.sink);
            let config = self.config.clone();

            tasks.spawn(async move {
                let status = process_pair(&*supplier, &*sink, &config, &symbol, timeframe).await;
                drop(permit);
                PairOutcome {
                    symbol,
                    timeframe,
                    status,
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    // A panicking pair must not take the batch down.
                    error!(error = %join_error, "signal worker panicked");
                }
            }
        }

        let report = BatchReport::from_outcomes(outcomes);
        info!(
            succeeded = report.succeeded,
            skipped = report.skipped,
            cancelled = report.cancelled,
            failed = report.failed,
            rows = report.rows_written,
            "signal batch finished"
        );
        report
    }
}

/// Process one pair end to end: fetch, scan, upsert.
async fn process_pair(
    supplier: &dyn BarSupplier,
    sink: &dyn ResultSink,
    config: &DriverConfig,
    symbol: &str,
    timeframe: Timeframe,
) -> PairStatus {
    let series = match supplier.fetch_series(symbol, timeframe).await {
        Ok(Some(series)) => series,
        Ok(None) => {
            warn!(symbol, timeframe = %timeframe, "no series available; skipping pair");
            return PairStatus::SkippedNoData;
        }
        Err(DataError::SymbolNotFound(_)) | Err(DataError::NoDataAvailable) => {
            warn!(symbol, timeframe = %timeframe, "no data for pair; skipping");
            return PairStatus::SkippedNoData;
        }
        Err(e) => {
            error!(symbol, timeframe = %timeframe, error = %e, "failed to fetch series");
            return PairStatus::Failed {
                error: e.to_string(),
            };
        }
    };

    if series.is_empty() {
        warn!(symbol, timeframe = %timeframe, "series has zero bars; skipping pair");
        return PairStatus::SkippedNoData;
    }

    let rows = if series.len() < config.minimum_bars_required {
        info!(
            symbol,
            timeframe = %timeframe,
            bars = series.len(),
            required = config.minimum_bars_required,
            "insufficient history; emitting all-none signals"
        );
        degenerate_rows(&series)
    } else {
        match scan_series(&series, &config.engine) {
            Ok(rows) => rows,
            Err(e) => {
                error!(symbol, timeframe = %timeframe, error = %e, "series scan failed");
                return PairStatus::Failed {
                    error: e.to_string(),
                };
            }
        }
    };

    match sink.upsert(&rows).await {
        Ok(()) => PairStatus::Succeeded { rows: rows.len() },
        Err(e) => {
            error!(symbol, timeframe = %timeframe, error = %e, "sink upsert failed");
            PairStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pivot_core::error::SinkError;
    use pivot_core::types::{Bar, Series, Signal, SignalRow};
    use pivot_data::MemoryBarSupplier;
    use pivot_sink::MemorySink;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn breakout_series(symbol: &str, timeframe: Timeframe) -> Series {
        Series::from_bars(
            symbol.to_string(),
            timeframe,
            vec![
                Bar::new(date(1), 10.0, 9.0, 9.5),
                Bar::new(date(2), 11.0, 9.0, 10.5).with_pivot_high(12.0),
                Bar::new(date(3), 13.0, 10.0, 12.5),
            ],
        )
    }

    fn driver_config() -> DriverConfig {
        DriverConfig {
            engine: EngineConfig {
                use_trend_filter: false,
                ..EngineConfig::default()
            },
            ..DriverConfig::default()
        }
    }

    #[tokio::test]
    async fn test_batch_over_mixed_pairs() {
        let mut supplier = MemoryBarSupplier::new();
        supplier.insert(breakout_series("AAPL", Timeframe::Daily));
        supplier.insert(breakout_series("AAPL", Timeframe::Weekly));
        // MSFT has a malformed series: dates out of order.
        supplier.insert(Series::from_bars(
            "MSFT".to_string(),
            Timeframe::Daily,
            vec![
                Bar::new(date(5), 10.0, 9.0, 9.5),
                Bar::new(date(2), 10.0, 9.0, 9.5),
            ],
        ));

        let sink = Arc::new(MemorySink::new());
        let driver = BatchDriver::new(driver_config(), Arc::new(supplier), sink.clone());

        let pairs = vec![
            ("AAPL".to_string(), Timeframe::Daily),
            ("AAPL".to_string(), Timeframe::Weekly),
            ("MSFT".to_string(), Timeframe::Daily), // fails, batch continues
            ("GONE".to_string(), Timeframe::Daily), // absent, skipped
        ];
        let report = driver.run(&pairs).await;

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.rows_written, 6);
        assert_eq!(sink.len(), 6);

        // The breakout fired for both succeeding pairs.
        let buys: Vec<SignalRow> = sink
            .snapshot()
            .into_iter()
            .filter(|r| r.signal == Signal::Buy)
            .collect();
        assert_eq!(buys.len(), 2);
        assert!(buys.iter().all(|r| r.date == date(3)));
    }

    #[tokio::test]
    async fn test_minimum_bars_required_degenerates() {
        let mut supplier = MemoryBarSupplier::new();
        supplier.insert(breakout_series("AAPL", Timeframe::Daily));

        let config = DriverConfig {
            minimum_bars_required: 10,
            ..driver_config()
        };
        let sink = Arc::new(MemorySink::new());
        let driver = BatchDriver::new(config, Arc::new(supplier), sink.clone());

        let report = driver
            .run(&[("AAPL".to_string(), Timeframe::Daily)])
            .await;

        assert_eq!(report.succeeded, 1);
        let rows = sink.snapshot();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.signal == Signal::None));
    }

    #[tokio::test]
    async fn test_cancel_before_start_skips_all() {
        let mut supplier = MemoryBarSupplier::new();
        supplier.insert(breakout_series("AAPL", Timeframe::Daily));

        let sink = Arc::new(MemorySink::new());
        let driver = BatchDriver::new(driver_config(), Arc::new(supplier), sink.clone());
        driver.cancel_token().cancel();

        let report = driver
            .run(&[
                ("AAPL".to_string(), Timeframe::Daily),
                ("MSFT".to_string(), Timeframe::Daily),
            ])
            .await;

        assert_eq!(report.cancelled, 2);
        assert_eq!(report.succeeded, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_rerun_writes_identical_rows() {
        let mut supplier = MemoryBarSupplier::new();
        supplier.insert(breakout_series("AAPL", Timeframe::Daily));
        let supplier = Arc::new(supplier);

        let sink = Arc::new(MemorySink::new());
        let driver = BatchDriver::new(driver_config(), supplier.clone(), sink.clone());
        let pairs = vec![("AAPL".to_string(), Timeframe::Daily)];

        driver.run(&pairs).await;
        let first = sink.snapshot();
        driver.run(&pairs).await;
        let second = sink.snapshot();

        assert_eq!(first, second);
    }

    struct FailingSink;

    #[async_trait]
    impl ResultSink for FailingSink {
        async fn upsert(&self, _rows: &[SignalRow]) -> Result<(), SinkError> {
            Err(SinkError::WriteError("disk full".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_sink_failure_is_per_pair() {
        let mut supplier = MemoryBarSupplier::new();
        supplier.insert(breakout_series("AAPL", Timeframe::Daily));

        let driver = BatchDriver::new(driver_config(), Arc::new(supplier), Arc::new(FailingSink));
        let report = driver
            .run(&[("AAPL".to_string(), Timeframe::Daily)])
            .await;

        assert_eq!(report.failed, 1);
        assert!(matches!(
            report.outcomes[0].status,
            PairStatus::Failed { .. }
        ));
    }
}
