use std::collections::VecDeque;

use crate::indicators::calculate_bollinger;
use crate::models::Bar;

/// Read side of the indicator pipeline consumed by the signal evaluator
///
/// The evaluator only ever needs the latest couple of closes and the latest
/// band values, so the interface is deliberately narrow.
pub trait IndicatorFeed {
    /// Ingest a new bar of the feed's granularity
    fn update(&mut self, bar: &Bar);

    /// Whether enough history has been observed for signals to be evaluated
    fn is_ready(&self) -> bool;

    /// The `n` most recent closes, oldest first
    fn latest_closes(&self, n: usize) -> Vec<f64>;

    /// Bollinger bands `(upper, lower)` over the most recent `window` closes
    fn bands(&self, window: usize, deviation: f64) -> Option<(f64, f64)>;
}

/// Rolling buffer of closing prices
///
/// Ready once the buffer has filled to capacity, which is sized at twice the
/// band window so band values are stable before the first signal.
#[derive(Debug, Clone)]
pub struct RollingCloses {
    closes: VecDeque<f64>,
    capacity: usize,
}

impl RollingCloses {
    pub fn new(capacity: usize) -> Self {
        Self {
            closes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

impl IndicatorFeed for RollingCloses {
    fn update(&mut self, bar: &Bar) {
        self.closes.push_back(bar.close);
        while self.closes.len() > self.capacity {
            self.closes.pop_front();
        }
    }

    fn is_ready(&self) -> bool {
        self.closes.len() >= self.capacity
    }

    fn latest_closes(&self, n: usize) -> Vec<f64> {
        let skip = self.closes.len().saturating_sub(n);
        self.closes.iter().skip(skip).copied().collect()
    }

    fn bands(&self, window: usize, deviation: f64) -> Option<(f64, f64)> {
        let prices: Vec<f64> = self.closes.iter().copied().collect();
        calculate_bollinger(&prices, window, deviation)
    }
}
