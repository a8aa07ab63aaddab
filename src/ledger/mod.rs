//! Transaction ledger records and CSV loading

mod error;
mod event;
pub mod loader;

pub use error::LedgerError;
pub use event::{code_from_description, EventKind, LedgerEvent, DATE_FORMAT, TRANSFER_TYPES};
pub use loader::{load_ledger, load_ledger_from_reader, parse_date};
