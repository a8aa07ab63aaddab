//! Accrual engine: per-investment balance integral, interest, fees, and effective rate

mod engine;
mod error;
mod investment;

pub use engine::{AccrualEngine, ReplayOutcome};
pub use error::{AccrualError, Result};
pub use investment::{Investment, DAYS_PER_YEAR};
