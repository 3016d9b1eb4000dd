//! In-memory result sink.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pivot_core::error::SinkError;
use pivot_core::traits::ResultSink;
use pivot_core::types::{SignalKey, SignalRow};

/// Result sink backed by a keyed map behind a mutex.
///
/// Upserts on `(symbol, timeframe, date)`; a rerun overwrites rather
/// than appends, and concurrent writers for different pairs serialize
/// on the lock. The map is ordered, so snapshots come out sorted by
/// key (date-ascending within a pair).
#[derive(Default)]
pub struct MemorySink {
    rows: Mutex<BTreeMap<SignalKey, SignalRow>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all rows, sorted by key.
    pub fn snapshot(&self) -> Vec<SignalRow> {
        let rows = self.rows.lock().unwrap();
        rows.values().cloned().collect()
    }

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Check if the sink holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn upsert(&self, rows: &[SignalRow]) -> Result<(), SinkError> {
        let mut map = self.rows.lock().unwrap();
        for row in rows {
            map.insert(row.key(), row.clone());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pivot_core::types::{Signal, Timeframe};
    use std::sync::Arc;

    fn row(symbol: &str, day: u32, signal: Signal) -> SignalRow {
        SignalRow {
            symbol: symbol.to_string(),
            timeframe: Timeframe::Daily,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            signal,
            buy_level: Some(12.0),
            stop_level: None,
            in_position: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_on_conflict() {
        let sink = MemorySink::new();
        sink.upsert(&[row("AAPL", 2, Signal::None)]).await.unwrap();
        sink.upsert(&[row("AAPL", 2, Signal::Buy)]).await.unwrap();

        let rows = sink.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].signal, Signal::Buy);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let sink = MemorySink::new();
        let batch = vec![row("AAPL", 2, Signal::None), row("AAPL", 3, Signal::Buy)];

        sink.upsert(&batch).await.unwrap();
        let first = sink.snapshot();
        sink.upsert(&batch).await.unwrap();
        let second = sink.snapshot();

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_writers_for_different_pairs() {
        let sink = Arc::new(MemorySink::new());
        let mut handles = Vec::new();

        for (i, symbol) in ["AAPL", "MSFT", "QQQ", "SPY"].iter().enumerate() {
            let sink = Arc::clone(&sink);
            let symbol = symbol.to_string();
            handles.push(tokio::spawn(async move {
                for day in 1..=10u32 {
                    let mut r = row(&symbol, day, Signal::None);
                    r.buy_level = Some(i as f64);
                    sink.upsert(&[r]).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(sink.len(), 40);
    }
}
