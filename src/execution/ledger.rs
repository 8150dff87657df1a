use serde::{Deserialize, Serialize};

/// Position below this size is treated as flat
const FLAT_EPSILON: f64 = 1e-9;

/// Cost basis and realized-profit accounting for one instrument
///
/// Mutated only by confirmed fills and by the entry reset in the signal
/// evaluator. Lives for the whole strategy run; snaps back to flat values
/// whenever the position is fully closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionLedger {
    /// Signed quantity held; this strategy never goes net short
    pub position_size: f64,
    /// Volume-weighted cost basis of the open position, 0 when flat
    pub average_price: f64,
    /// Price of the most recent long fill, the pyramid reference point
    pub last_entry_price: f64,
    /// Completed entry/pyramid buy fills since the position was last flat
    pub pyramid_count: u32,
    /// Cumulative fee-adjusted profit across all closing fills
    pub realized_profit: f64,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current exposure at the given price
    pub fn notional(&self, price: f64) -> f64 {
        self.position_size * price
    }

    /// Fold a confirmed long fill into the weighted average
    pub fn apply_long_fill(&mut self, fill_price: f64, fill_volume: f64) {
        let total = self.average_price * self.position_size + fill_price * fill_volume;
        self.position_size += fill_volume;
        self.average_price = total / self.position_size;
    }

    /// Book a confirmed short (closing) fill
    ///
    /// Profit is fee-adjusted with a round-trip estimate charged against the
    /// exit leg: `2 * fee_rate * fill_volume * fill_price`. Reaching zero
    /// size resets the cost basis and pyramid counter immediately, so the
    /// flat invariant holds without waiting for the next entry signal.
    pub fn apply_short_fill(&mut self, fill_price: f64, fill_volume: f64, fee_rate: f64) {
        self.realized_profit += (fill_price - self.average_price) * fill_volume
            - fill_volume * fill_price * 2.0 * fee_rate;
        self.position_size -= fill_volume;

        if self.position_size.abs() < FLAT_EPSILON {
            self.position_size = 0.0;
            self.average_price = 0.0;
            self.pyramid_count = 0;
        }
    }

    /// Record a completed entry/pyramid buy order
    pub fn record_entry_fill(&mut self, price: f64) {
        self.pyramid_count += 1;
        self.last_entry_price = price;
    }

    /// Clear the pyramid counter and cost basis ahead of a fresh entry
    ///
    /// Any residual dust position below the minimum notional is kept.
    pub fn reset_for_entry(&mut self) {
        self.pyramid_count = 0;
        self.average_price = 0.0;
    }
}
