//! Real Interest - effective interest rate earned on each investment of an account
//!
//! This library provides:
//! - Loading of an account's transaction history (CSV export)
//! - An accrual engine tracking, per investment, the time-weighted outstanding
//!   balance, interest received, and fees paid
//! - Effective annual rates as of any date: (interest − fees) / ∫ balance dt
//! - Account reports and parallel "as of" replays over a series of dates

pub mod money;
pub mod ledger;
pub mod accrual;
pub mod report;
pub mod scenario;
pub mod exit;

// Re-export commonly used types
pub use money::{Money, Rate};
pub use ledger::{load_ledger, LedgerEvent, EventKind, LedgerError};
pub use accrual::{AccrualEngine, AccrualError, Investment, ReplayOutcome};
pub use report::{AccountReport, InvestmentSummary};
pub use scenario::ScenarioRunner;
