//! Pivot confirmation: lag realignment of raw pivot flags.
//!
//! Upstream pivot detection needs a look-ahead window to know a local
//! extreme was real, so the raw flag sits on a bar where it was not yet
//! knowable. Shifting it forward by the confirmation lag puts the value
//! on the first bar where the downstream state machine may use it.

use pivot_core::types::Bar;

/// Confirmed pivot values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfirmedPivot {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

/// Get the confirmed pivot values for bar `index`.
///
/// `confirmed[i] = raw[i - lag]` for `i >= lag`; both values are `None`
/// below the lag. Pure function of index and lag.
pub fn confirmed_at(bars: &[Bar], index: usize, lag: usize) -> ConfirmedPivot {
    match index.checked_sub(lag) {
        Some(source) => ConfirmedPivot {
            high: bars[source].pivot_high,
            low: bars[source].pivot_low,
        },
        None => ConfirmedPivot::default(),
    }
}
