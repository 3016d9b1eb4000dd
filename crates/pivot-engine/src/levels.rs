//! Sticky level tracking: forward-fill of confirmed pivots.

use crate::confirmation::ConfirmedPivot;

/// Sticky buy-level/stop-level register for one series.
///
/// A level, once set by a confirmed pivot, persists across all
/// subsequent bars until a newer confirmed pivot of the same type
/// replaces it. One instance is created per series scan and discarded
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelState {
    last_confirmed_high: Option<f64>,
    last_confirmed_low: Option<f64>,
}

impl LevelState {
    /// Create a fresh register with both levels unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one bar's confirmed pivots into the register.
    pub fn observe(&mut self, confirmed: ConfirmedPivot) {
        if let Some(high) = confirmed.high {
            self.last_confirmed_high = Some(high);
        }
        if let Some(low) = confirmed.low {
            self.last_confirmed_low = Some(low);
        }
    }

    /// Breakout entry level: the last confirmed pivot high.
    #[inline]
    pub fn buy_level(&self) -> Option<f64> {
        self.last_confirmed_high
    }

    /// Breakdown exit level: the last confirmed pivot low.
    #[inline]
    pub fn stop_level(&self) -> Option<f64> {
        self.last_confirmed_low
    }

    /// True if no pivot of either type has been confirmed yet.
    pub fn is_unset(&self) -> bool {
        self.last_confirmed_high.is_none() && self.last_confirmed_low.is_none()
    }
}
