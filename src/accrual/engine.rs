//! Accrual engine: registry of investments and ledger replay

use chrono::NaiveDate;
use std::collections::btree_map::{BTreeMap, Entry};

use super::error::{AccrualError, Result};
use super::investment::Investment;
use crate::ledger::{EventKind, LedgerEvent};
use crate::money::{Money, Rate};

/// Counts and leftovers of one ledger replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Events applied to an investment
    pub applied: usize,
    /// Events dated after the as-of date
    pub skipped: usize,
    /// Rows of types the engine does not model, in ledger order
    pub unhandled: Vec<LedgerEvent>,
}

/// All investments of one account, keyed (and iterated) by code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccrualEngine {
    investments: BTreeMap<String, Investment>,
}

impl AccrualEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new investment from its (negative) ledger amount
    pub fn create(&mut self, code: &str, amount: Money, date: NaiveDate) -> Result<&Investment> {
        match self.investments.entry(code.to_string()) {
            Entry::Occupied(_) => Err(AccrualError::DuplicateInvestment {
                code: code.to_string(),
                date,
            }),
            Entry::Vacant(slot) => {
                let investment = slot.insert(Investment::open(code, amount, date)?);
                log::debug!("{}", investment);
                Ok(investment)
            }
        }
    }

    pub fn apply_principal_return(
        &mut self,
        code: &str,
        date: NaiveDate,
        amount: Money,
    ) -> Result<()> {
        self.get_mut(code)?.return_principal(date, amount)
    }

    pub fn apply_fee(&mut self, code: &str, amount: Money) -> Result<()> {
        self.get_mut(code)?.charge_fee(amount)
    }

    pub fn apply_interest(&mut self, code: &str, date: NaiveDate, amount: Money) -> Result<()> {
        self.get_mut(code)?.pay_interest(date, amount);
        Ok(())
    }

    pub fn effective_rate(&self, code: &str, as_of: NaiveDate) -> Result<Rate> {
        self.investments
            .get(code)
            .ok_or_else(|| unknown(code))?
            .effective_rate(as_of)
    }

    /// Apply one ledger event. Returns false for row types the engine does not model.
    ///
    /// A handled row type without an investment code fails with `MissingCode`.
    pub fn apply(&mut self, event: &LedgerEvent) -> Result<bool> {
        match &event.kind {
            EventKind::Investment { code } => {
                self.create(code, event.amount, event.date)?;
            }
            EventKind::Principal { code } => {
                self.apply_principal_return(code, event.date, event.amount)?;
            }
            EventKind::Interest { code } => {
                self.apply_interest(code, event.date, event.amount)?;
            }
            EventKind::Fee { code } => {
                self.apply_fee(code, event.amount)?;
            }
            EventKind::Uncoded { transaction_type } => {
                return Err(AccrualError::MissingCode {
                    transaction_type: transaction_type.clone(),
                    date: event.date,
                    description: event.description.clone(),
                });
            }
            EventKind::Other { .. } => return Ok(false),
        }
        Ok(true)
    }

    /// Replay a chronologically ordered ledger as of `as_of`.
    ///
    /// Events dated after `as_of` leave every investment untouched. The first
    /// failing event aborts the replay.
    pub fn replay<'a, I>(&mut self, events: I, as_of: NaiveDate) -> Result<ReplayOutcome>
    where
        I: IntoIterator<Item = &'a LedgerEvent>,
    {
        let mut outcome = ReplayOutcome::default();

        for event in events {
            if event.date > as_of {
                log::debug!(
                    "Skip row {}: {} is after as-of date.",
                    event.kind.code().unwrap_or(event.kind.transaction_type()),
                    event.date
                );
                outcome.skipped += 1;
                continue;
            }

            if self.apply(event)? {
                outcome.applied += 1;
            } else {
                outcome.unhandled.push(event.clone());
            }
        }

        log::info!(
            "Replayed ledger as of {}: {} applied, {} skipped, {} unhandled, {} investments",
            as_of,
            outcome.applied,
            outcome.skipped,
            outcome.unhandled.len(),
            self.investments.len()
        );
        Ok(outcome)
    }

    pub fn get(&self, code: &str) -> Option<&Investment> {
        self.investments.get(code)
    }

    /// Investments in sorted code order
    pub fn iter(&self) -> impl Iterator<Item = &Investment> {
        self.investments.values()
    }

    pub fn len(&self) -> usize {
        self.investments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investments.is_empty()
    }

    fn get_mut(&mut self, code: &str) -> Result<&mut Investment> {
        self.investments.get_mut(code).ok_or_else(|| unknown(code))
    }
}

fn unknown(code: &str) -> AccrualError {
    AccrualError::UnknownInvestment {
        code: code.to_string(),
    }
}
