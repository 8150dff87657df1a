// Trading strategy module
pub mod martingale;

pub use martingale::{MartingaleConfig, MartingaleStrategy};
