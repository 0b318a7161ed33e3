pub mod config;
pub mod error;
pub mod rng;

pub use config::FightConfig;
pub use error::{DuelError, Result};
pub use rng::{Randomness, SeededRng};
