// Simulation module: synthetic bar generation and the paper-trading runner
pub mod runner;
pub mod synthetic;

pub use runner::{SimReport, SimRunner};
pub use synthetic::{MarketScenario, SyntheticBarGenerator};
