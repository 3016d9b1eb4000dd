//! CSV bar supplier.
//!
//! Reads one file per (symbol, timeframe) pair from a data directory:
//! `{symbol}_{daily|weekly|monthly}.csv`, with a bare `{symbol}.csv`
//! accepted for daily data. The pivot columns are optional; empty
//! fields deserialize to `None`.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use pivot_core::error::DataError;
use pivot_core::traits::BarSupplier;
use pivot_core::types::{Bar, Series, Timeframe};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date")]
    date: String,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "PivotHigh", alias = "pivot_high", default)]
    pivot_high: Option<f64>,
    #[serde(alias = "PivotLow", alias = "pivot_low", default)]
    pivot_low: Option<f64>,
    #[serde(alias = "TrendAverage", alias = "trend_average", default)]
    trend_average: Option<f64>,
}

/// Bar supplier backed by a directory of CSV files.
pub struct CsvBarSupplier {
    dir: PathBuf,
}

impl CsvBarSupplier {
    /// Create a supplier over the given data directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(DataError::Internal(format!(
                "data directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// File name candidates for a pair, checked in order.
    fn candidate_paths(&self, symbol: &str, timeframe: Timeframe) -> Vec<PathBuf> {
        let lower = symbol.to_lowercase();
        let slug = timeframe.slug();
        let mut candidates = vec![
            self.dir.join(format!("{}_{}.csv", symbol, slug)),
            self.dir.join(format!("{}_{}.csv", lower, slug)),
        ];
        if timeframe == Timeframe::Daily {
            candidates.push(self.dir.join(format!("{}.csv", symbol)));
            candidates.push(self.dir.join(format!("{}.csv", lower)));
        }
        candidates
    }

    /// Enumerate the (symbol, timeframe) pairs present in the directory.
    ///
    /// `{symbol}_{slug}.csv` names map to their timeframe; any other
    /// `.csv` file is taken as daily data for the file stem.
    pub fn discover_pairs(&self) -> Result<Vec<(String, Timeframe)>, DataError> {
        let mut pairs = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| DataError::Internal(format!("reading data directory: {}", e)))?;

        for entry in entries {
            let entry = entry.map_err(|e| DataError::Internal(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let pair = match stem.rsplit_once('_') {
                Some((symbol, suffix)) => match Timeframe::from_str(suffix) {
                    Ok(timeframe) => (symbol.to_string(), timeframe),
                    Err(_) => (stem.to_string(), Timeframe::Daily),
                },
                None => (stem.to_string(), Timeframe::Daily),
            };
            pairs.push(pair);
        }

        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }

    /// Load bars from a specific path.
    fn load_from_path(&self, path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            let mut bar = Bar::new(
                parse_date(&record.date)?,
                record.high,
                record.low,
                record.close,
            );
            bar.pivot_high = record.pivot_high;
            bar.pivot_low = record.pivot_low;
            bar.trend_average = record.trend_average;
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(date);
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl BarSupplier for CsvBarSupplier {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<Series>, DataError> {
        for path in self.candidate_paths(symbol, timeframe) {
            if path.is_file() {
                let bars = self.load_from_path(&path)?;
                tracing::debug!(
                    symbol,
                    timeframe = %timeframe,
                    bars = bars.len(),
                    file = %path.display(),
                    "loaded series from csv"
                );
                return Ok(Some(Series::from_bars(
                    symbol.to_string(),
                    timeframe,
                    bars,
                )));
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
