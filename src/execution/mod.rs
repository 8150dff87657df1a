// Position accounting and order bookkeeping module
pub mod gateway;
pub mod ledger;
pub mod order_tracker;

pub use gateway::{GatewayError, GatewayEvent, OrderGateway, PaperGateway};
pub use ledger::PositionLedger;
pub use order_tracker::{OrderTracker, TrackerOutcome};
