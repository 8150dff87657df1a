use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Bar;

/// Market scenarios for exercising the martingale lifecycle
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MarketScenario {
    /// Quiet base then a sustained rally (entry without pyramids)
    Breakout,
    /// Rally into a deep staircase drop, then a recovery (full lifecycle)
    DipAndRecover,
    /// Persistent decline with no recovery (pyramids until the cap)
    GrindDown,
    /// Mean-reverting chop around the base price (mostly no signals)
    Sideways,
}

/// Generates seeded synthetic close-price bars
pub struct SyntheticBarGenerator {
    rng: StdRng,
    base_price: f64,
}

impl SyntheticBarGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 100.0,
        }
    }

    /// Generate `num_bars` fast bars for the given scenario, one minute apart
    pub fn generate(&mut self, scenario: MarketScenario, num_bars: usize) -> Vec<Bar> {
        let start_time = Utc::now() - Duration::minutes(num_bars as i64);

        match scenario {
            MarketScenario::Breakout => self.generate_breakout(start_time, num_bars),
            MarketScenario::DipAndRecover => self.generate_dip_and_recover(start_time, num_bars),
            MarketScenario::GrindDown => self.generate_grind_down(start_time, num_bars),
            MarketScenario::Sideways => self.generate_sideways(start_time, num_bars),
        }
    }

    /// Flat first half, steady rally in the second half
    fn generate_breakout(&mut self, start_time: DateTime<Utc>, num_bars: usize) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(num_bars);
        let mut price = self.base_price;

        for i in 0..num_bars {
            if i < num_bars / 2 {
                let noise = price * self.rng.gen_range(-0.0005..0.0005);
                price += noise;
            } else {
                let drift = price * 0.0008;
                let noise = price * self.rng.gen_range(-0.0005..0.0005);
                price += drift + noise;
            }
            bars.push(self.bar_at(start_time, i, price));
        }

        bars
    }

    /// Quiet base, rally, staircase drop of ~15%, then recovery past the base
    fn generate_dip_and_recover(&mut self, start_time: DateTime<Utc>, num_bars: usize) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(num_bars);
        let mut price = self.base_price;
        let quarter = num_bars / 4;

        for i in 0..num_bars {
            let noise = price * self.rng.gen_range(-0.0005..0.0005);
            if i < quarter {
                price += noise;
            } else if i < 2 * quarter {
                price += price * 0.0010 + noise;
            } else if i < 3 * quarter {
                price -= price * 0.0007 - noise;
            } else {
                price += price * 0.0012 + noise;
            }
            bars.push(self.bar_at(start_time, i, price));
        }

        bars
    }

    /// Quiet base, brief pop, then persistent decline
    fn generate_grind_down(&mut self, start_time: DateTime<Utc>, num_bars: usize) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(num_bars);
        let mut price = self.base_price;
        let quarter = num_bars / 4;

        for i in 0..num_bars {
            let noise = price * self.rng.gen_range(-0.0005..0.0005);
            if i < quarter {
                price += noise;
            } else if i < quarter + quarter / 2 {
                price += price * 0.0012 + noise;
            } else {
                price -= price * 0.0008 - noise;
            }
            // Keep the instrument priced
            if price < self.base_price * 0.2 {
                price = self.base_price * 0.2;
            }
            bars.push(self.bar_at(start_time, i, price));
        }

        bars
    }

    /// Mean-reverting random walk around the base price
    fn generate_sideways(&mut self, start_time: DateTime<Utc>, num_bars: usize) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(num_bars);
        let mut price = self.base_price;

        for i in 0..num_bars {
            let reversion = (self.base_price - price) * 0.05;
            let noise = price * self.rng.gen_range(-0.002..0.002);
            price += reversion + noise;
            bars.push(self.bar_at(start_time, i, price));
        }

        bars
    }

    fn bar_at(&self, start_time: DateTime<Utc>, index: usize, price: f64) -> Bar {
        Bar::new(start_time + Duration::minutes(index as i64), price)
    }
}
