//! Core types and traits for the pivot-breakout signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Series)
//! - Signal output types (Signal, SignalRow, SignalKey)
//! - Core traits for bar suppliers and result sinks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{PivotError, PivotResult};
pub use types::*;
pub use traits::*;
