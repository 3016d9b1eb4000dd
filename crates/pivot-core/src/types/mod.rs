//! Core data types for the signal engine.

mod bar;
mod signal;
mod timeframe;

pub use bar::{Bar, Series};
pub use signal::{Signal, SignalKey, SignalRow};
pub use timeframe::Timeframe;
