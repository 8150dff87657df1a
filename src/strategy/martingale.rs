use crate::execution::{OrderGateway, OrderTracker, PositionLedger, TrackerOutcome};
use crate::indicators::{IndicatorFeed, RollingCloses};
use crate::models::{Bar, Direction, OrderUpdate, TradeFill};

/// Martingale breakout strategy parameters
///
/// Immutable per run. Defaults match the tuning this strategy has
/// historically traded with on perpetual futures.
#[derive(Debug, Clone)]
pub struct MartingaleConfig {
    /// Bollinger band window (slow bars)
    pub boll_window: usize,

    /// Bollinger band deviation multiplier
    pub boll_dev: f64,

    /// Drop from the last entry price that triggers a pyramid add (e.g. 0.04 = 4%)
    pub dump_trigger_pct: f64,

    /// Gain over the average price that triggers a full exit (e.g. 0.02 = 2%)
    pub exit_profit_pct: f64,

    /// Quote value of the initial entry
    pub initial_notional: f64,

    /// Each pyramid add is the initial notional scaled by this multiplier
    /// raised to the number of completed adds
    pub size_multiplier: f64,

    /// Maximum number of pyramid adds after which dumps are ignored
    pub max_pyramid_count: u32,

    /// Per-side trading fee; profit is charged a round-trip estimate at exit
    pub fee_rate: f64,

    /// Exposure below this quote value counts as flat
    pub min_notional: f64,
}

impl Default for MartingaleConfig {
    fn default() -> Self {
        Self {
            boll_window: 30,
            boll_dev: 2.2,
            dump_trigger_pct: 0.04,
            exit_profit_pct: 0.02,
            initial_notional: 1000.0,
            size_multiplier: 1.3,
            max_pyramid_count: 10,
            fee_rate: 0.00075,
            min_notional: 11.0,
        }
    }
}

/// Position-management and signal-decision engine for one instrument
///
/// A pure decision module: the host feeds it bars and gateway events through
/// the four handlers and it issues orders through the gateway passed in.
/// Events are processed to completion one at a time, so no internal locking
/// is needed; each instrument owns an independent instance.
pub struct MartingaleStrategy<F: IndicatorFeed = RollingCloses> {
    config: MartingaleConfig,
    ledger: PositionLedger,
    tracker: OrderTracker,
    feed: F,
}

impl MartingaleStrategy<RollingCloses> {
    /// Build a strategy with a rolling close buffer sized at twice the band
    /// window, so band values have settled before the first signal.
    pub fn new(config: MartingaleConfig) -> Self {
        let feed = RollingCloses::new(config.boll_window * 2);
        Self::with_feed(config, feed)
    }
}

impl<F: IndicatorFeed> MartingaleStrategy<F> {
    pub fn with_feed(config: MartingaleConfig, feed: F) -> Self {
        Self {
            config,
            ledger: PositionLedger::new(),
            tracker: OrderTracker::new(),
            feed,
        }
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn tracker(&self) -> &OrderTracker {
        &self.tracker
    }

    pub fn config(&self) -> &MartingaleConfig {
        &self.config
    }

    /// Breakout entry check, run once per slow bar
    ///
    /// Fires on a strict upward crossing of the upper band while effectively
    /// flat. A new signal supersedes anything still resting at the gateway,
    /// so everything outstanding is cancelled before the entry is placed.
    pub fn on_slow_bar(&mut self, bar: &Bar, gateway: &mut dyn OrderGateway) -> anyhow::Result<()> {
        self.feed.update(bar);
        if !self.feed.is_ready() {
            return Ok(());
        }

        let closes = self.feed.latest_closes(2);
        if closes.len() < 2 {
            return Ok(());
        }
        let (last_close, current_close) = (closes[0], closes[1]);

        let Some((boll_up, _boll_down)) = self
            .feed
            .bands(self.config.boll_window, self.config.boll_dev)
        else {
            return Ok(());
        };

        if last_close <= boll_up && boll_up < current_close {
            let effectively_flat = self.ledger.notional(bar.close) < self.config.min_notional;
            if !self.tracker.has_pending_buys() && effectively_flat {
                gateway.cancel_all()?;
                self.ledger.reset_for_entry();

                let price = bar.close;
                let volume = self.config.initial_notional / price;
                let ids = gateway.submit_buy(price, volume)?;
                self.tracker.track_buys(&ids);

                tracing::info!(
                    "Breakout entry: close {:.4} crossed band {:.4}, buying {:.6} @ {:.4}",
                    current_close,
                    boll_up,
                    volume,
                    price
                );
            }
        }

        Ok(())
    }

    /// Profit-exit and pyramid checks, run once per fast bar
    ///
    /// Both checks are skipped while exposure is below the minimum notional.
    /// The exit check runs first; the two are independent and each cancels
    /// outstanding orders before submitting its own.
    pub fn on_fast_bar(&mut self, bar: &Bar, gateway: &mut dyn OrderGateway) -> anyhow::Result<()> {
        if self.ledger.notional(bar.close) < self.config.min_notional {
            return Ok(());
        }

        if !self.tracker.has_pending_sells() && self.ledger.average_price > 0.0 {
            let profit_pct = bar.close / self.ledger.average_price - 1.0;
            if profit_pct >= self.config.exit_profit_pct {
                gateway.cancel_all()?;

                let volume = self.ledger.position_size.abs();
                let ids = gateway.submit_sell(bar.close, volume)?;
                self.tracker.track_sells(&ids);

                tracing::info!(
                    "Profit exit: {:.2}% over avg {:.4}, selling {:.6} @ {:.4}",
                    profit_pct * 100.0,
                    self.ledger.average_price,
                    volume,
                    bar.close
                );
            }
        }

        let dump_pct = self.ledger.last_entry_price / bar.close - 1.0;
        if !self.tracker.has_pending_buys()
            && self.ledger.pyramid_count <= self.config.max_pyramid_count
            && dump_pct >= self.config.dump_trigger_pct
        {
            gateway.cancel_all()?;

            let add_notional = self.config.initial_notional
                * self
                    .config
                    .size_multiplier
                    .powi(self.ledger.pyramid_count as i32);
            let price = bar.close;
            let volume = add_notional / price;
            let ids = gateway.submit_buy(price, volume)?;
            self.tracker.track_buys(&ids);

            tracing::info!(
                "Pyramid add #{}: dump {:.2}% off last entry {:.4}, buying {:.6} @ {:.4}",
                self.ledger.pyramid_count,
                dump_pct * 100.0,
                self.ledger.last_entry_price,
                volume,
                price
            );
        }

        Ok(())
    }

    /// Reconcile an order-status event from the gateway
    pub fn on_order_status(&mut self, update: &OrderUpdate) {
        match self.tracker.apply(update) {
            TrackerOutcome::BuyFilled => {
                self.ledger.record_entry_fill(update.price);
                tracing::info!(
                    "Buy order {} filled @ {:.4} (pyramid count {})",
                    update.id,
                    update.price,
                    self.ledger.pyramid_count
                );
            }
            TrackerOutcome::Removed => {
                tracing::debug!("Order {} left the book ({:?})", update.id, update.status);
            }
            TrackerOutcome::StillActive | TrackerOutcome::Untracked => {}
        }
    }

    /// Fold a confirmed trade fill into the position ledger
    pub fn on_trade(&mut self, fill: &TradeFill) {
        match fill.direction {
            Direction::Long => {
                self.ledger.apply_long_fill(fill.price, fill.volume);
                tracing::debug!(
                    "Long fill {:.6} @ {:.4}, avg now {:.4}",
                    fill.volume,
                    fill.price,
                    self.ledger.average_price
                );
            }
            Direction::Short => {
                self.ledger
                    .apply_short_fill(fill.price, fill.volume, self.config.fee_rate);
                tracing::info!(
                    "Short fill {:.6} @ {:.4}, realized profit {:.4}",
                    fill.volume,
                    fill.price,
                    self.ledger.realized_profit
                );
            }
        }
    }
}
