//! Bar supplier trait definition.

use crate::error::DataError;
use crate::types::{Series, Timeframe};
use async_trait::async_trait;

/// Trait for sources of historical bar series.
///
/// Suppliers return closed, finite series ordered oldest to newest.
/// An absent pair is `Ok(None)` so the driver can skip it without
/// treating it as a failure.
#[async_trait]
pub trait BarSupplier: Send + Sync {
    /// Fetch the series for one (symbol, timeframe) pair.
    ///
    /// # Returns
    /// * `Ok(Some(series))` with bars ordered date-ascending
    /// * `Ok(None)` if the supplier has no data for the pair
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<Series>, DataError>;

    /// Get the supplier name.
    fn name(&self) -> &str;
}
