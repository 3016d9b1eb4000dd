//! Price bar and series types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::EngineError;

/// One historical price bar, enriched with pre-computed swing-pivot
/// indicators from the upstream detector.
///
/// `pivot_high`/`pivot_low` carry the raw (unconfirmed) pivot values on
/// the bar where the detector flagged them; `trend_average` is the
/// optional trend gate value. All three are `None` when the upstream
/// source has no value for the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Calendar date of the bar
    pub date: NaiveDate,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Raw pivot-high value, if the detector flagged one on this bar
    pub pivot_high: Option<f64>,
    /// Raw pivot-low value, if the detector flagged one on this bar
    pub pivot_low: Option<f64>,
    /// Trend average used by the buy-side trend filter
    pub trend_average: Option<f64>,
}

impl Bar {
    /// Create a new bar without pivot annotations.
    pub fn new(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            high,
            low,
            close,
            pivot_high: None,
            pivot_low: None,
            trend_average: None,
        }
    }

    /// Attach a raw pivot-high value.
    pub fn with_pivot_high(mut self, value: f64) -> Self {
        self.pivot_high = Some(value);
        self
    }

    /// Attach a raw pivot-low value.
    pub fn with_pivot_low(mut self, value: f64) -> Self {
        self.pivot_low = Some(value);
        self
    }

    /// Attach a trend-average value.
    pub fn with_trend_average(mut self, value: f64) -> Self {
        self.trend_average = Some(value);
        self
    }

    /// Check that all price fields are finite numbers.
    #[inline]
    pub fn has_finite_prices(&self) -> bool {
        self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Ordered series of bars for exactly one (symbol, timeframe) pair.
///
/// Invariant: bars are in strictly increasing date order. The series is
/// gap-tolerant; missing calendar dates are fine, duplicates are not.
#[derive(Debug, Clone)]
pub struct Series {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl Series {
    /// Create a new empty series.
    pub fn new(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Create a series from a vector of bars.
    ///
    /// The bars are assumed to already be date-ascending; callers that
    /// cannot guarantee that should sort first and rely on
    /// [`Series::validate`] before scanning.
    pub fn from_bars(symbol: String, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        Self {
            symbol,
            timeframe,
            bars,
        }
    }

    /// Append a bar.
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Check the series invariants: finite prices and strictly
    /// increasing dates.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (index, bar) in self.bars.iter().enumerate() {
            if !bar.has_finite_prices() {
                return Err(EngineError::InvalidPrice { index });
            }
            if index > 0 {
                let prev = self.bars[index - 1].date;
                if bar.date <= prev {
                    return Err(EngineError::OutOfOrderBar {
                        index,
                        date: bar.date,
                        prev,
                    });
                }
            }
        }
        Ok(())
    }
}
