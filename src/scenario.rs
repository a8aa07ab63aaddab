//! Scenario runner for "as of" replays
//!
//! Parses the ledger once, then replays it on a fresh engine for each
//! requested date. Dates are independent, so a series of dates is computed
//! in parallel.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use std::path::Path;

use crate::accrual::{AccrualEngine, AccrualError, ReplayOutcome, Result};
use crate::ledger::{load_ledger, LedgerError, LedgerEvent};
use crate::report::AccountReport;

/// Report and replay details for one as-of date
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub report: AccountReport,
    pub replay: ReplayOutcome,
    pub engine: AccrualEngine,
}

/// Pre-loaded ledger for repeated replays
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_path("history.csv")?;
/// let today = runner.run(as_of)?;
/// let series = runner.run_dates(&ScenarioRunner::date_range(start, end, 30))?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Ledger events, oldest first
    events: Vec<LedgerEvent>,
}

impl ScenarioRunner {
    /// Create runner from events already in chronological order
    pub fn new(events: Vec<LedgerEvent>) -> Self {
        Self { events }
    }

    /// Create runner by loading a ledger CSV export
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LedgerError> {
        Ok(Self::new(load_ledger(path)?))
    }

    /// Replay the ledger as of one date
    pub fn run(&self, as_of: NaiveDate) -> Result<ScenarioResult> {
        let mut engine = AccrualEngine::new();
        let replay = engine.replay(&self.events, as_of)?;
        let report = AccountReport::build(&engine, as_of)?;
        Ok(ScenarioResult {
            report,
            replay,
            engine,
        })
    }

    /// Reports for each date, in the order given.
    ///
    /// A date on which some investment has had no exposure yet (its creation
    /// date) has no defined rate, so that date is left out of the series.
    /// Any other failure aborts the series with the error of the first
    /// failing date.
    pub fn run_dates(&self, dates: &[NaiveDate]) -> Result<Vec<AccountReport>> {
        let reports: Vec<Option<AccountReport>> = dates
            .par_iter()
            .map(|&as_of| match self.run(as_of) {
                Ok(result) => Ok(Some(result.report)),
                Err(AccrualError::ZeroExposure { code, .. }) => {
                    log::warn!("Leaving out {}: {} has no exposure yet", as_of, code);
                    Ok(None)
                }
                Err(err) => Err(err),
            })
            .collect::<Result<_>>()?;
        Ok(reports.into_iter().flatten().collect())
    }

    /// `start`, `start + step`, ... up to and including `end`
    pub fn date_range(start: NaiveDate, end: NaiveDate, step_days: u32) -> Vec<NaiveDate> {
        let step = Duration::days(i64::from(step_days.max(1)));
        std::iter::successors(Some(start), |&d| Some(d + step))
            .take_while(|&d| d <= end)
            .collect()
    }

    /// Earliest date in the ledger
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.events.first().map(|e| e.date)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}
