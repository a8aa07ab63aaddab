//! Ledger event records as read from the account history export

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::money::Money;

/// Date format used by the export and on the command line, e.g. 2024-02-09
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Transaction types that move money between the account and its own bank,
/// listed among unhandled rows only on request
pub const TRANSFER_TYPES: [&str; 4] = [
    "Withdrawal - ACH",
    "Deposit - ACH",
    "Withdrawal - Wire",
    "Deposit - Wire",
];

/// What a ledger row does to an investment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// Initial principal paid into a new investment (negative amount)
    Investment { code: String },
    /// Partial or full return of principal (non-negative amount)
    Principal { code: String },
    /// Interest paid out
    Interest { code: String },
    /// Fee charged against the investment (negative amount)
    Fee { code: String },
    /// One of the four types above whose description names no investment;
    /// rejected only if replay reaches it
    Uncoded { transaction_type: String },
    /// Any other row: transfers, adjustments, and types not modelled
    Other {
        transaction_type: String,
        code: Option<String>,
    },
}

impl EventKind {
    /// Investment code the row refers to, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            EventKind::Investment { code }
            | EventKind::Principal { code }
            | EventKind::Interest { code }
            | EventKind::Fee { code } => Some(code.as_str()),
            EventKind::Other { code, .. } => code.as_deref(),
            EventKind::Uncoded { .. } => None,
        }
    }

    /// Transaction type as written in the export
    pub fn transaction_type(&self) -> &str {
        match self {
            EventKind::Investment { .. } => "Investment",
            EventKind::Principal { .. } => "Principal",
            EventKind::Interest { .. } => "Interest",
            EventKind::Fee { .. } => "Fee",
            EventKind::Other { transaction_type, .. }
            | EventKind::Uncoded { transaction_type } => transaction_type,
        }
    }

    pub fn is_transfer(&self) -> bool {
        match self {
            EventKind::Other { transaction_type, .. } => {
                TRANSFER_TYPES.contains(&transaction_type.as_str())
            }
            _ => false,
        }
    }
}

/// A single dated row of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    /// Signed amount in the export's convention (money leaving the account is negative)
    pub amount: Money,
    pub description: String,
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:<18} {:>12}  {}",
            self.date.format(DATE_FORMAT),
            self.kind.transaction_type(),
            self.amount.to_string(),
            self.description
        )
    }
}

/// Extract the investment code from a row description.
///
/// The code is whatever sits inside the first pair of parentheses,
/// e.g. `"Interest payment (WSF1 2023-9)"` gives `"WSF1 2023-9"`.
pub fn code_from_description(description: &str) -> Option<&str> {
    let (_, rest) = description.split_once('(')?;
    let (code, _) = rest.split_once(')')?;
    Some(code)
}
