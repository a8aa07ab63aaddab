use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccrualError {
    #[error("attempt to initialize a second investment with code {code} (on {date})")]
    DuplicateInvestment { code: String, date: NaiveDate },

    #[error("invalid amount {amount} for {code}: {reason}")]
    InvalidAmount {
        code: String,
        amount: Money,
        reason: &'static str,
    },

    #[error(
        "event for {code} dated {date} precedes its last balance change on {last_change}; \
         transactions must be ordered from oldest to newest"
    )]
    OutOfOrderEvent {
        code: String,
        date: NaiveDate,
        last_change: NaiveDate,
    },

    #[error(
        "no investment with code {code}; \
         the file must go back to each investment's initial deposit"
    )]
    UnknownInvestment { code: String },

    #[error(
        "as-of date {as_of} is before the last recorded balance change of {code} on {last_change}"
    )]
    StaleQuery {
        code: String,
        as_of: NaiveDate,
        last_change: NaiveDate,
    },

    #[error(
        "no principal has been outstanding for {code} as of {as_of}, \
         so its effective rate is undefined"
    )]
    ZeroExposure { code: String, as_of: NaiveDate },

    #[error(
        "{transaction_type} row dated {date} has no parenthesized investment code: {description:?}"
    )]
    MissingCode {
        transaction_type: String,
        date: NaiveDate,
        description: String,
    },
}

impl AccrualError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AccrualError::DuplicateInvestment { .. } => 101,
            AccrualError::InvalidAmount { .. } => 105,
            AccrualError::OutOfOrderEvent { .. } => 106,
            AccrualError::UnknownInvestment { .. } => 107,
            AccrualError::StaleQuery { .. } => 108,
            AccrualError::ZeroExposure { .. } => 109,
            AccrualError::MissingCode { .. } => 110,
        }
    }
}

pub type Result<T> = std::result::Result<T, AccrualError>;
