//! Buy-side trend filter.

/// Optional gate that suppresses a buy breakout when the breakout level
/// sits at or below the bar's trend average.
///
/// The filter never gates sell/breakdown conditions, and a bar without
/// a trend average is passed through unfiltered rather than blocked.
#[derive(Debug, Clone, Copy)]
pub struct TrendFilter {
    enabled: bool,
}

impl TrendFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check whether a candidate buy breakout is allowed on this bar.
    pub fn allows_buy(&self, buy_level: Option<f64>, trend_average: Option<f64>) -> bool {
        if !self.enabled {
            return true;
        }
        match (buy_level, trend_average) {
            (Some(level), Some(average)) => level > average,
            // Missing trend value bypasses the filter for this bar only.
            _ => true,
        }
    }
}
