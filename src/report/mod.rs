//! Report building and rendering

mod summary;
pub mod render;

pub use summary::{AccountReport, InvestmentSummary, ReportTotals};
pub use render::{format_dollars, write_json, write_table, write_unhandled};
