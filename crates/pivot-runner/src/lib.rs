//! Batch driver for the signal engine.
//!
//! Iterates all (symbol, timeframe) pairs with a bounded worker pool,
//! runs the per-series scan to completion inside each worker, and
//! forwards the rows to the result sink. Pairs are fully independent;
//! a failure in one never aborts the others.

mod driver;
mod report;

pub use driver::{BatchDriver, CancelToken, DriverConfig};
pub use report::{BatchReport, PairOutcome, PairStatus};
