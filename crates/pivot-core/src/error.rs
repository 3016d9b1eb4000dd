//! Error types for the signal engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level signal engine error.
#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Bar supplier errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested pair")]
    NoDataAvailable,

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Errors raised by the per-series scan.
///
/// These indicate a malformed series, not a degenerate-but-valid one:
/// too-short series produce all-"None" output rather than an error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("bar {index} has a non-finite price field")]
    InvalidPrice { index: usize },

    #[error("bar {index} ({date}) is not after its predecessor ({prev})")]
    OutOfOrderBar {
        index: usize,
        date: NaiveDate,
        prev: NaiveDate,
    },
}

/// Result sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Write error: {0}")]
    WriteError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Sink error: {0}")]
    Internal(String),
}

/// Result type alias for signal engine operations.
pub type PivotResult<T> = Result<T, PivotError>;
