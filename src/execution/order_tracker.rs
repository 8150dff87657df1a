use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Direction, OrderStatus, OrderUpdate};

/// What an order-status event meant for the tracked sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerOutcome {
    /// A tracked buy order fully filled; the ledger should record the entry
    BuyFilled,
    /// A tracked order left the book without fully filling (cancel/reject),
    /// or a tracked sell completed; nothing to record beyond the removal
    Removed,
    /// Order still working at the gateway
    StillActive,
    /// Terminal event for an id we are not tracking (duplicate or stale)
    Untracked,
}

/// Outstanding order bookkeeping
///
/// An id lives in at most one of the two sets and is removed exactly once,
/// when the gateway reports the order no longer active. Duplicate or late
/// events fall through as `Untracked` and are ignored by the caller.
#[derive(Debug, Clone, Default)]
pub struct OrderTracker {
    pending_buys: HashSet<Uuid>,
    pending_sells: HashSet<Uuid>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_buys(&mut self, ids: &[Uuid]) {
        self.pending_buys.extend(ids.iter().copied());
    }

    pub fn track_sells(&mut self, ids: &[Uuid]) {
        self.pending_sells.extend(ids.iter().copied());
    }

    pub fn has_pending_buys(&self) -> bool {
        !self.pending_buys.is_empty()
    }

    pub fn has_pending_sells(&self) -> bool {
        !self.pending_sells.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_buys.len() + self.pending_sells.len()
    }

    /// Reconcile one gateway status event against the tracked sets
    ///
    /// The buy-fill outcome is gated on the removal from `pending_buys`, so a
    /// completed buy order is reported at most once no matter how many
    /// status or partial-trade events the gateway emits for it.
    pub fn apply(&mut self, update: &OrderUpdate) -> TrackerOutcome {
        if update.status.is_active() {
            return TrackerOutcome::StillActive;
        }

        if self.pending_buys.remove(&update.id) {
            if update.direction == Direction::Long && update.status == OrderStatus::AllTraded {
                return TrackerOutcome::BuyFilled;
            }
            return TrackerOutcome::Removed;
        }

        if self.pending_sells.remove(&update.id) {
            return TrackerOutcome::Removed;
        }

        tracing::debug!(
            "Ignoring status event for untracked order {} ({:?})",
            update.id,
            update.status
        );
        TrackerOutcome::Untracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: Uuid, direction: Direction, status: OrderStatus) -> OrderUpdate {
        OrderUpdate {
            id,
            direction,
            status,
            price: 100.0,
            volume: 1.0,
        }
    }

    #[test]
    fn test_buy_fill_reported_once() {
        let mut tracker = OrderTracker::new();
        let id = Uuid::new_v4();
        tracker.track_buys(&[id]);

        let event = update(id, Direction::Long, OrderStatus::AllTraded);
        assert_eq!(tracker.apply(&event), TrackerOutcome::BuyFilled);

        // Duplicate terminal event must not double-count
        assert_eq!(tracker.apply(&event), TrackerOutcome::Untracked);
        assert!(!tracker.has_pending_buys());
    }

    #[test]
    fn test_cancelled_buy_removed_without_fill() {
        let mut tracker = OrderTracker::new();
        let id = Uuid::new_v4();
        tracker.track_buys(&[id]);

        let event = update(id, Direction::Long, OrderStatus::Cancelled);
        assert_eq!(tracker.apply(&event), TrackerOutcome::Removed);
        assert!(!tracker.has_pending_buys());
    }

    #[test]
    fn test_rejected_handled_like_cancelled() {
        let mut tracker = OrderTracker::new();
        let id = Uuid::new_v4();
        tracker.track_sells(&[id]);

        let event = update(id, Direction::Short, OrderStatus::Rejected);
        assert_eq!(tracker.apply(&event), TrackerOutcome::Removed);
        assert!(!tracker.has_pending_sells());
    }

    #[test]
    fn test_active_statuses_leave_sets_untouched() {
        let mut tracker = OrderTracker::new();
        let id = Uuid::new_v4();
        tracker.track_buys(&[id]);

        for status in [
            OrderStatus::Submitting,
            OrderStatus::NotTraded,
            OrderStatus::PartTraded,
        ] {
            let event = update(id, Direction::Long, status);
            assert_eq!(tracker.apply(&event), TrackerOutcome::StillActive);
        }
        assert!(tracker.has_pending_buys());
    }

    #[test]
    fn test_stale_event_ignored() {
        let mut tracker = OrderTracker::new();
        let event = update(Uuid::new_v4(), Direction::Long, OrderStatus::AllTraded);
        assert_eq!(tracker.apply(&event), TrackerOutcome::Untracked);
    }

    #[test]
    fn test_sets_are_disjoint() {
        let mut tracker = OrderTracker::new();
        let buy = Uuid::new_v4();
        let sell = Uuid::new_v4();
        tracker.track_buys(&[buy]);
        tracker.track_sells(&[sell]);

        assert_eq!(tracker.pending_count(), 2);

        let event = update(sell, Direction::Short, OrderStatus::AllTraded);
        assert_eq!(tracker.apply(&event), TrackerOutcome::Removed);
        assert!(tracker.has_pending_buys());
        assert!(!tracker.has_pending_sells());
    }
}
