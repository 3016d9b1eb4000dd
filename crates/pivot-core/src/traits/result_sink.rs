//! Result sink trait definition.

use crate::error::SinkError;
use crate::types::SignalRow;
use async_trait::async_trait;

/// Trait for destinations of computed signal rows.
///
/// Writes are keyed upserts on `(symbol, timeframe, date)`: a conflict
/// overwrites all non-key fields, so reruns and partial-failure retries
/// never duplicate or corrupt rows. Implementations must be safe under
/// concurrent writers for different pairs.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Upsert a batch of rows.
    ///
    /// Rows within one call arrive date-ascending for a single pair;
    /// no ordering holds across calls from different workers.
    async fn upsert(&self, rows: &[SignalRow]) -> Result<(), SinkError>;

    /// Get the sink name.
    fn name(&self) -> &str;
}
