//! Signal output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timeframe;

/// Trading signal emitted for a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::None => "None",
        };
        write!(f, "{}", s)
    }
}

/// Unique key of a signal row: one row per (symbol, timeframe, date).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalKey {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub date: NaiveDate,
}

/// One output row per bar, consumed by the result sink.
///
/// Re-running on identical input reproduces identical rows; sinks
/// upsert on [`SignalKey`] so reruns overwrite rather than append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub date: NaiveDate,
    pub signal: Signal,
    pub buy_level: Option<f64>,
    pub stop_level: Option<f64>,
    pub in_position: bool,
}

impl SignalRow {
    /// Get the upsert key for this row.
    pub fn key(&self) -> SignalKey {
        SignalKey {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            date: self.date,
        }
    }
}
