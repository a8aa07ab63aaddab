use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("expected date format YYYY-MM-DD; supplied: {value}")]
    InvalidDate { value: String },

    #[error("file not found; supplied: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("amount must be a decimal number such as -1234.56; supplied: {value}")]
    InvalidAmount { value: String },

    #[error("malformed CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read ledger: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            LedgerError::InvalidDate { .. } => 103,
            LedgerError::FileNotFound { .. } => 104,
            LedgerError::InvalidAmount { .. } => 105,
            LedgerError::Csv(_) | LedgerError::Io(_) => 111,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
