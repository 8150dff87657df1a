use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single aggregated price bar
///
/// The strategy only ever reads the closing price. Two granularities of the
/// same stream are delivered to it: "fast" bars drive pyramid/exit checks,
/// "slow" bars drive breakout entry checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Order / trade direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

/// Lifecycle status of an order at the gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Submitting,
    NotTraded,
    PartTraded,
    AllTraded,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Whether the order is still working at the gateway
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Submitting | OrderStatus::NotTraded | OrderStatus::PartTraded
        )
    }
}

/// Asynchronous order-status event reported by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub direction: Direction,
    pub status: OrderStatus,
    /// Requested order price; for fully filled limit orders this is the
    /// price the order executed at.
    pub price: f64,
    pub volume: f64,
}

/// Asynchronous trade-fill event reported by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFill {
    pub direction: Direction,
    pub price: f64,
    pub volume: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::Submitting.is_active());
        assert!(OrderStatus::NotTraded.is_active());
        assert!(OrderStatus::PartTraded.is_active());
        assert!(!OrderStatus::AllTraded.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
        assert!(!OrderStatus::Rejected.is_active());
    }

    #[test]
    fn test_bar_creation() {
        let bar = Bar::new(Utc::now(), 101.5);
        assert_eq!(bar.close, 101.5);
    }
}
