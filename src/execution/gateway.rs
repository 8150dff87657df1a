use std::collections::VecDeque;

use uuid::Uuid;

use crate::models::{Direction, OrderStatus, OrderUpdate, TradeFill};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid order: price={price}, volume={volume}")]
    InvalidOrder { price: f64, volume: f64 },
}

/// Outbound order interface
///
/// Submission and cancellation are fire-and-forget: the `Ok` result only
/// means the request was accepted for routing. Fills, cancels and rejections
/// arrive later as asynchronous status/trade events.
pub trait OrderGateway {
    fn submit_buy(&mut self, price: f64, volume: f64) -> anyhow::Result<Vec<Uuid>>;
    fn submit_sell(&mut self, price: f64, volume: f64) -> anyhow::Result<Vec<Uuid>>;
    fn cancel_all(&mut self) -> anyhow::Result<()>;
}

/// Event emitted back from the gateway to the strategy
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Order(OrderUpdate),
    Trade(TradeFill),
}

#[derive(Debug, Clone)]
struct RestingOrder {
    id: Uuid,
    direction: Direction,
    price: f64,
    volume: f64,
}

/// In-memory gateway for simulation and tests
///
/// Submitted orders rest on a book until the driver either fills them at
/// their limit price (`fill_open_orders`) or the strategy cancels them.
/// Every transition is queued as an event for the driver to dispatch back
/// into the strategy, preserving the asynchronous event flow of a live
/// exchange connection.
#[derive(Debug, Default)]
pub struct PaperGateway {
    resting: Vec<RestingOrder>,
    events: VecDeque<GatewayEvent>,
}

impl PaperGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn submit(&mut self, direction: Direction, price: f64, volume: f64) -> anyhow::Result<Vec<Uuid>> {
        if !(price.is_finite() && volume.is_finite() && price > 0.0 && volume > 0.0) {
            return Err(GatewayError::InvalidOrder { price, volume }.into());
        }

        let id = Uuid::new_v4();
        self.resting.push(RestingOrder {
            id,
            direction,
            price,
            volume,
        });
        self.events.push_back(GatewayEvent::Order(OrderUpdate {
            id,
            direction,
            status: OrderStatus::NotTraded,
            price,
            volume,
        }));

        tracing::debug!("Accepted {:?} order {} {}@{}", direction, id, volume, price);
        Ok(vec![id])
    }

    /// Fill every resting order at its limit price
    ///
    /// Emits the trade fill before the terminal status event, matching the
    /// usual exchange sequencing.
    pub fn fill_open_orders(&mut self) {
        for order in self.resting.drain(..) {
            self.events.push_back(GatewayEvent::Trade(TradeFill {
                direction: order.direction,
                price: order.price,
                volume: order.volume,
            }));
            self.events.push_back(GatewayEvent::Order(OrderUpdate {
                id: order.id,
                direction: order.direction,
                status: OrderStatus::AllTraded,
                price: order.price,
                volume: order.volume,
            }));
        }
    }

    /// Drain all queued events in emission order
    pub fn drain_events(&mut self) -> Vec<GatewayEvent> {
        self.events.drain(..).collect()
    }

    pub fn open_order_count(&self) -> usize {
        self.resting.len()
    }
}

impl OrderGateway for PaperGateway {
    fn submit_buy(&mut self, price: f64, volume: f64) -> anyhow::Result<Vec<Uuid>> {
        self.submit(Direction::Long, price, volume)
    }

    fn submit_sell(&mut self, price: f64, volume: f64) -> anyhow::Result<Vec<Uuid>> {
        self.submit(Direction::Short, price, volume)
    }

    fn cancel_all(&mut self) -> anyhow::Result<()> {
        for order in self.resting.drain(..) {
            self.events.push_back(GatewayEvent::Order(OrderUpdate {
                id: order.id,
                direction: order.direction,
                status: OrderStatus::Cancelled,
                price: order.price,
                volume: order.volume,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_returns_single_id() {
        let mut gateway = PaperGateway::new();
        let ids = gateway.submit_buy(100.0, 1.0).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(gateway.open_order_count(), 1);
    }

    #[test]
    fn test_rejects_degenerate_orders() {
        let mut gateway = PaperGateway::new();
        assert!(gateway.submit_buy(100.0, 0.0).is_err());
        assert!(gateway.submit_buy(-1.0, 1.0).is_err());
        assert!(gateway.submit_sell(f64::NAN, 1.0).is_err());
        assert_eq!(gateway.open_order_count(), 0);
    }

    #[test]
    fn test_fill_emits_trade_then_status() {
        let mut gateway = PaperGateway::new();
        let ids = gateway.submit_buy(100.0, 2.0).unwrap();
        gateway.drain_events(); // discard the acknowledgement

        gateway.fill_open_orders();
        let events = gateway.drain_events();
        assert_eq!(events.len(), 2);

        match &events[0] {
            GatewayEvent::Trade(fill) => {
                assert_eq!(fill.direction, Direction::Long);
                assert_eq!(fill.price, 100.0);
                assert_eq!(fill.volume, 2.0);
            }
            other => panic!("expected trade first, got {:?}", other),
        }
        match &events[1] {
            GatewayEvent::Order(update) => {
                assert_eq!(update.id, ids[0]);
                assert_eq!(update.status, OrderStatus::AllTraded);
            }
            other => panic!("expected status second, got {:?}", other),
        }
        assert_eq!(gateway.open_order_count(), 0);
    }

    #[test]
    fn test_cancel_all_is_idempotent() {
        let mut gateway = PaperGateway::new();
        gateway.submit_buy(100.0, 1.0).unwrap();
        gateway.submit_sell(110.0, 1.0).unwrap();
        gateway.drain_events();

        gateway.cancel_all().unwrap();
        let events = gateway.drain_events();
        assert_eq!(events.len(), 2);
        for event in &events {
            match event {
                GatewayEvent::Order(update) => assert_eq!(update.status, OrderStatus::Cancelled),
                other => panic!("expected status event, got {:?}", other),
            }
        }

        // Second cancel finds nothing to do
        gateway.cancel_all().unwrap();
        assert!(gateway.drain_events().is_empty());
    }
}
