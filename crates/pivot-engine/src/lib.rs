//! Pivot-breakout signal computation.
//!
//! This crate contains the pure, per-series pipeline:
//! - pivot confirmation (lag realignment of raw pivot flags)
//! - sticky level tracking (forward-fill of confirmed pivots)
//! - the optional buy-side trend filter
//! - the flat/long signal state machine
//!
//! [`scan_series`] runs the stages in one left-to-right pass with O(1)
//! carried state and no I/O; the batch driver owns all boundary work.

mod confirmation;
mod levels;
mod scan;
mod state_machine;
mod trend;

pub use confirmation::{confirmed_at, ConfirmedPivot};
pub use levels::LevelState;
pub use scan::{degenerate_rows, scan_series, EngineConfig};
pub use state_machine::{PositionStateMachine, LAGGED_POSITION_UPDATE};
pub use trend::TrendFilter;
