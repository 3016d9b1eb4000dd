//! Per-series scan: runs confirmation, level tracking, the trend
//! filter, and the state machine in one left-to-right pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use pivot_core::error::EngineError;
use pivot_core::types::{Series, Signal, SignalRow};

use crate::confirmation::confirmed_at;
use crate::levels::LevelState;
use crate::state_machine::{PositionStateMachine, LAGGED_POSITION_UPDATE};
use crate::trend::TrendFilter;

/// Configuration for the per-series scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bars by which raw pivot flags are delayed before being usable
    #[serde(default = "default_confirmation_lag")]
    pub confirmation_lag: usize,
    /// Gate buy breakouts on the trend average
    #[serde(default = "default_use_trend_filter")]
    pub use_trend_filter: bool,
    /// Update the position flag from the previous bar's conditions
    #[serde(default = "default_lagged_position_update")]
    pub lagged_position_update: bool,
}

fn default_confirmation_lag() -> usize {
    1
}

fn default_use_trend_filter() -> bool {
    true
}

fn default_lagged_position_update() -> bool {
    LAGGED_POSITION_UPDATE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confirmation_lag: default_confirmation_lag(),
            use_trend_filter: default_use_trend_filter(),
            lagged_position_update: default_lagged_position_update(),
        }
    }
}

/// Scan one series and produce its signal rows, date-ascending.
///
/// The scan is deterministic: identical input yields identical rows.
/// A series shorter than the confirmation lag degenerates to all-"None"
/// rows; that is valid output, not an error. Errors indicate a
/// malformed series (non-finite prices, out-of-order dates).
pub fn scan_series(series: &Series, config: &EngineConfig) -> Result<Vec<SignalRow>, EngineError> {
    series.validate()?;

    let bars = series.bars();
    let filter = TrendFilter::new(config.use_trend_filter);
    let mut levels = LevelState::new();
    let mut machine = PositionStateMachine::new(config.lagged_position_update);
    let mut rows = Vec::with_capacity(bars.len());

    for (index, bar) in bars.iter().enumerate() {
        levels.observe(confirmed_at(bars, index, config.confirmation_lag));
        let buy_level = levels.buy_level();
        let stop_level = levels.stop_level();

        let buy = buy_level.is_some_and(|level| bar.high > level)
            && filter.allows_buy(buy_level, bar.trend_average);
        let sell = stop_level.is_some_and(|level| bar.low < level);

        let (signal, in_position) = machine.advance(buy, sell);

        rows.push(SignalRow {
            symbol: series.symbol.clone(),
            timeframe: series.timeframe,
            date: bar.date,
            signal,
            buy_level,
            stop_level,
            in_position,
        });
    }

    if !bars.is_empty() && levels.is_unset() {
        debug!(
            symbol = %series.symbol,
            timeframe = %series.timeframe,
            bars = bars.len(),
            "no pivot ever confirmed; no breakout possible"
        );
    }

    Ok(rows)
}

/// Produce the all-"None" row sequence for a series with insufficient
/// history, without running the pivot scan.
pub fn degenerate_rows(series: &Series) -> Vec<SignalRow> {
    series
        .bars()
        .iter()
        .map(|bar| SignalRow {
            symbol: series.symbol.clone(),
            timeframe: series.timeframe,
            date: bar.date,
            signal: Signal::None,
            buy_level: None,
            stop_level: None,
            in_position: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pivot_core::types::{Bar, Timeframe};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(bars: Vec<Bar>) -> Series {
        Series::from_bars("TEST".to_string(), Timeframe::Daily, bars)
    }

    fn no_filter_config() -> EngineConfig {
        EngineConfig {
            use_trend_filter: false,
            ..EngineConfig::default()
        }
    }

    // Breakout above a freshly confirmed pivot high fires a Buy on the
    // bar where the flag is still flat.
    #[test]
    fn test_breakout_buy() {
        let bars = vec![
            Bar::new(date(1), 10.0, 9.0, 9.5),
            Bar::new(date(2), 11.0, 9.0, 10.5).with_pivot_high(12.0),
            Bar::new(date(3), 13.0, 10.0, 12.5),
        ];
        let rows = scan_series(&series(bars), &no_filter_config()).unwrap();

        assert_eq!(rows[2].buy_level, Some(12.0));
        assert_eq!(rows[2].signal, Signal::Buy);
        assert!(!rows[2].in_position);
        assert_eq!(rows[0].signal, Signal::None);
        assert_eq!(rows[1].signal, Signal::None);
    }

    // Same breakout, but the trend filter blocks it because the level
    // does not clear the trend average.
    #[test]
    fn test_trend_filter_blocks_buy() {
        let bars = vec![
            Bar::new(date(1), 10.0, 9.0, 9.5),
            Bar::new(date(2), 11.0, 9.0, 10.5).with_pivot_high(12.0),
            Bar::new(date(3), 13.0, 10.0, 12.5).with_trend_average(12.5),
        ];
        let rows = scan_series(&series(bars), &EngineConfig::default()).unwrap();

        assert_eq!(rows[2].buy_level, Some(12.0));
        assert_eq!(rows[2].signal, Signal::None);
    }

    // The filter only bypasses bars that have no trend value.
    #[test]
    fn test_trend_filter_bypassed_without_average() {
        let bars = vec![
            Bar::new(date(1), 10.0, 9.0, 9.5),
            Bar::new(date(2), 11.0, 9.0, 10.5).with_pivot_high(12.0),
            Bar::new(date(3), 13.0, 10.0, 12.5),
        ];
        let rows = scan_series(&series(bars), &EngineConfig::default()).unwrap();
        assert_eq!(rows[2].signal, Signal::Buy);
    }

    #[test]
    fn test_no_pivot_ever_confirmed() {
        let bars: Vec<Bar> = (1..=28)
            .map(|day| Bar::new(date(day), 11.0, 9.0, 10.0))
            .collect();
        let rows = scan_series(&series(bars), &no_filter_config()).unwrap();

        assert_eq!(rows.len(), 28);
        for row in &rows {
            assert_eq!(row.signal, Signal::None);
            assert_eq!(row.buy_level, None);
            assert_eq!(row.stop_level, None);
            assert!(!row.in_position);
        }
    }

    // Full round trip: entry breakout, then a breakdown below the
    // confirmed pivot low exits the position one bar later.
    #[test]
    fn test_breakout_then_breakdown() {
        let bars = vec![
            Bar::new(date(1), 10.0, 9.0, 9.5).with_pivot_low(8.0),
            Bar::new(date(2), 11.0, 9.0, 10.5).with_pivot_high(12.0),
            Bar::new(date(3), 13.0, 10.0, 12.5), // breakout: Buy
            Bar::new(date(4), 13.5, 12.0, 13.0), // long now
            Bar::new(date(5), 12.5, 7.5, 8.0),   // breakdown: Sell
            Bar::new(date(6), 9.0, 7.0, 8.5),    // flat again, no repeat
        ];
        let rows = scan_series(&series(bars), &no_filter_config()).unwrap();

        assert_eq!(rows[2].signal, Signal::Buy);
        assert!(!rows[2].in_position);
        assert_eq!(rows[3].signal, Signal::None);
        assert!(rows[3].in_position);
        assert_eq!(rows[4].signal, Signal::Sell);
        assert!(rows[4].in_position);
        assert_eq!(rows[5].signal, Signal::None);
        assert!(!rows[5].in_position);
    }

    #[test]
    fn test_forward_fill_until_replaced() {
        let bars = vec![
            Bar::new(date(1), 10.0, 9.0, 9.5).with_pivot_high(12.0),
            Bar::new(date(2), 10.5, 9.0, 10.0),
            Bar::new(date(3), 10.5, 9.0, 10.0),
            Bar::new(date(4), 10.5, 9.0, 10.0).with_pivot_high(14.0),
            Bar::new(date(5), 10.5, 9.0, 10.0),
        ];
        let rows = scan_series(&series(bars), &no_filter_config()).unwrap();

        assert_eq!(rows[0].buy_level, None); // below the lag
        assert_eq!(rows[1].buy_level, Some(12.0));
        assert_eq!(rows[2].buy_level, Some(12.0));
        assert_eq!(rows[3].buy_level, Some(12.0));
        assert_eq!(rows[4].buy_level, Some(14.0));
    }

    #[test]
    fn test_series_shorter_than_lag_is_all_none() {
        let bars = vec![Bar::new(date(1), 13.0, 9.0, 10.0).with_pivot_high(12.0)];
        let config = EngineConfig {
            confirmation_lag: 2,
            use_trend_filter: false,
            ..EngineConfig::default()
        };
        let rows = scan_series(&series(bars), &config).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].signal, Signal::None);
        assert_eq!(rows[0].buy_level, None);
    }

    #[test]
    fn test_empty_series() {
        let rows = scan_series(&series(vec![]), &EngineConfig::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_series_is_rejected() {
        let bars = vec![
            Bar::new(date(3), 10.0, 9.0, 9.5),
            Bar::new(date(2), 10.0, 9.0, 9.5),
        ];
        assert!(scan_series(&series(bars), &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_determinism() {
        let bars: Vec<Bar> = (1..=25)
            .map(|day| {
                let mut bar = Bar::new(
                    date(day),
                    10.0 + (day as f64 * 0.3),
                    8.0 + (day as f64 * 0.25),
                    9.0 + (day as f64 * 0.28),
                );
                if day % 5 == 0 {
                    bar.pivot_high = Some(11.0 + day as f64 * 0.3);
                }
                if day % 7 == 0 {
                    bar.pivot_low = Some(8.5 + day as f64 * 0.2);
                }
                bar
            })
            .collect();
        let s = series(bars);
        let config = EngineConfig::default();

        let first = scan_series(&s, &config).unwrap();
        let second = scan_series(&s, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_rows() {
        let bars = vec![
            Bar::new(date(1), 13.0, 9.0, 10.0).with_pivot_high(12.0),
            Bar::new(date(2), 14.0, 9.0, 10.0),
        ];
        let rows = degenerate_rows(&series(bars));

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.signal == Signal::None));
        assert!(rows.iter().all(|r| r.buy_level.is_none()));
    }
}
