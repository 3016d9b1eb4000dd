//! Flat/long signal state machine.

use pivot_core::types::Signal;

/// When true, the position flag for bar `i` is updated from bar
/// `i-1`'s raw buy/sell conditions, replicating the reference behavior.
/// When false, the flag is updated from the current bar's conditions
/// after the signal is emitted (the same-bar variant), so the two
/// behaviors can be compared in isolation.
pub const LAGGED_POSITION_UPDATE: bool = true;

/// Per-series position state machine.
///
/// States are `Flat` and `Long`, mirrored by the `in_position` boolean
/// carried into each output row. The machine keeps only the two raw
/// conditions of the previous bar, so a full scan needs O(1) extra
/// memory.
#[derive(Debug, Clone, Copy)]
pub struct PositionStateMachine {
    lagged_update: bool,
    in_position: bool,
    prev_buy: bool,
    prev_sell: bool,
}

impl PositionStateMachine {
    /// Create a machine in the initial `Flat` state.
    pub fn new(lagged_update: bool) -> Self {
        Self {
            lagged_update,
            in_position: false,
            prev_buy: false,
            prev_sell: false,
        }
    }

    /// Advance one bar given its raw buy/sell conditions.
    ///
    /// In lagged mode the flag is updated first, from the previous
    /// bar's conditions (bar 0 has no predecessor and keeps the initial
    /// state), and the signal is computed from the just-updated flag:
    /// Buy when flat and breaking out, Sell when long and breaking
    /// down. Returns the emitted signal and the row's position flag.
    pub fn advance(&mut self, buy: bool, sell: bool) -> (Signal, bool) {
        if self.lagged_update {
            if self.prev_buy {
                self.in_position = true;
            }
            if self.prev_sell {
                self.in_position = false;
            }
        }

        let signal = if !self.in_position && buy {
            Signal::Buy
        } else if self.in_position && sell {
            Signal::Sell
        } else {
            Signal::None
        };

        if !self.lagged_update {
            if buy {
                self.in_position = true;
            }
            if sell {
                self.in_position = false;
            }
        }

        self.prev_buy = buy;
        self.prev_sell = sell;
        (signal, self.in_position)
    }

    /// Current position flag.
    #[inline]
    pub fn in_position(&self) -> bool {
        self.in_position
    }
}

impl Default for PositionStateMachine {
    fn default() -> Self {
        Self::new(LAGGED_POSITION_UPDATE)
    }
}
