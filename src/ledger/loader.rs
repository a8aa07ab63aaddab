//! Load the account transaction history from its CSV export

use super::error::{LedgerError, Result};
use super::event::{code_from_description, EventKind, LedgerEvent, DATE_FORMAT};
use crate::money::Money;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the export columns; any other columns are ignored
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Transaction Type")]
    transaction_type: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Amount")]
    amount: String,
}

impl CsvRow {
    fn to_event(self) -> Result<LedgerEvent> {
        let date = parse_date(&self.date)?;
        let amount: Money = self.amount.parse().map_err(|_| LedgerError::InvalidAmount {
            value: self.amount.clone(),
        })?;
        let code = code_from_description(&self.description).map(str::to_string);

        let kind = match (self.transaction_type.as_str(), code) {
            ("Investment", Some(code)) => EventKind::Investment { code },
            ("Principal", Some(code)) => EventKind::Principal { code },
            ("Interest", Some(code)) => EventKind::Interest { code },
            ("Fee", Some(code)) => EventKind::Fee { code },
            ("Investment" | "Principal" | "Interest" | "Fee", None) => EventKind::Uncoded {
                transaction_type: self.transaction_type.clone(),
            },
            (_, code) => EventKind::Other {
                transaction_type: self.transaction_type.clone(),
                code,
            },
        };

        Ok(LedgerEvent {
            date,
            kind,
            amount,
            description: self.description,
        })
    }
}

/// Parse a date written as YYYY-MM-DD
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| LedgerError::InvalidDate {
        value: value.to_string(),
    })
}

/// Load all ledger events from a CSV file, oldest first.
///
/// The export lists transactions newest first; the returned order is reversed.
pub fn load_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerEvent>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LedgerError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let events = read_events(reader)?;
    log::debug!("Loaded {} ledger rows from {}", events.len(), path.display());
    Ok(events)
}

/// Load ledger events from any reader (e.g., string buffer, stdin), oldest first
pub fn load_ledger_from_reader<R: Read>(reader: R) -> Result<Vec<LedgerEvent>> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_events(reader)
}

fn read_events<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<LedgerEvent>> {
    let mut events = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        events.push(row.to_event()?);
    }

    events.reverse();
    Ok(events)
}
