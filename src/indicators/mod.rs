// Technical indicators module
// Implements SMA and Bollinger bands plus the rolling close-price feed

pub mod bollinger;
pub mod feed;
pub mod moving_average;

pub use bollinger::calculate_bollinger;
pub use feed::{IndicatorFeed, RollingCloses};
pub use moving_average::calculate_sma;
