//! In-memory bar supplier.

use std::collections::HashMap;

use async_trait::async_trait;
use pivot_core::error::DataError;
use pivot_core::traits::BarSupplier;
use pivot_core::types::{Series, Timeframe};

/// Bar supplier over pre-loaded series, keyed by (symbol, timeframe).
///
/// Used by the driver tests and by library callers that already hold
/// their bars in memory.
#[derive(Default)]
pub struct MemoryBarSupplier {
    series: HashMap<(String, Timeframe), Series>,
}

impl MemoryBarSupplier {
    /// Create an empty supplier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, replacing any existing one for its pair.
    pub fn insert(&mut self, series: Series) {
        self.series
            .insert((series.symbol.clone(), series.timeframe), series);
    }

    /// Get the (symbol, timeframe) pairs held by this supplier.
    pub fn pairs(&self) -> Vec<(String, Timeframe)> {
        let mut pairs: Vec<_> = self.series.keys().cloned().collect();
        pairs.sort();
        pairs
    }
}

#[async_trait]
impl BarSupplier for MemoryBarSupplier {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<Series>, DataError> {
        Ok(self
            .series
            .get(&(symbol.to_string(), timeframe))
            .cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
