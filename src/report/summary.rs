//! Per-investment and account-level summaries as of a date

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::accrual::{AccrualEngine, Investment, Result};
use crate::money::{Money, Rate};

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestmentSummary {
    pub code: String,
    pub initial_principal: Money,
    pub interest: Money,
    pub fees: Money,
    pub balance: Money,
    pub effective_rate: Rate,
    /// Principal still outstanding and interest not paid on the as-of date
    pub rate_may_rise: bool,
}

impl InvestmentSummary {
    pub fn from_investment(investment: &Investment, as_of: NaiveDate) -> Result<Self> {
        Ok(Self {
            code: investment.code().to_string(),
            initial_principal: investment.initial_principal(),
            interest: investment.cumulative_interest(),
            fees: investment.cumulative_fees(),
            balance: investment.balance(),
            effective_rate: investment.effective_rate(as_of)?,
            rate_may_rise: investment.rate_may_rise(as_of),
        })
    }
}

/// Totals across all investments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReportTotals {
    pub initial_principal: Money,
    pub interest: Money,
    pub fees: Money,
    pub balance: Money,
    /// Σ(p0 · rate) / Σ(p0); zero when there are no investments
    pub weighted_rate: Rate,
}

/// Complete account report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    pub as_of: NaiveDate,

    /// Sorted by code
    pub investments: Vec<InvestmentSummary>,

    pub totals: ReportTotals,
}

impl AccountReport {
    /// Summarize every investment in the engine as of `as_of`
    pub fn build(engine: &AccrualEngine, as_of: NaiveDate) -> Result<Self> {
        let investments = engine
            .iter()
            .map(|inv| InvestmentSummary::from_investment(inv, as_of))
            .collect::<Result<Vec<_>>>()?;
        let totals = totals(&investments);

        Ok(Self {
            as_of,
            investments,
            totals,
        })
    }

    /// Whether any line carries the "rate may still rise" flag
    pub fn any_rate_may_rise(&self) -> bool {
        self.investments.iter().any(|s| s.rate_may_rise)
    }

    pub fn is_empty(&self) -> bool {
        self.investments.is_empty()
    }
}

fn totals(investments: &[InvestmentSummary]) -> ReportTotals {
    let initial_principal: Money = investments.iter().map(|s| s.initial_principal).sum();
    let weighted_sum: Decimal = investments
        .iter()
        .map(|s| s.initial_principal.as_decimal() * s.effective_rate.as_decimal())
        .sum();

    let weighted_rate = if initial_principal.is_zero() {
        Rate::ZERO
    } else {
        Rate::from_decimal(weighted_sum / initial_principal.as_decimal())
    };

    ReportTotals {
        initial_principal,
        interest: investments.iter().map(|s| s.interest).sum(),
        fees: investments.iter().map(|s| s.fees).sum(),
        balance: investments.iter().map(|s| s.balance).sum(),
        weighted_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(d: Decimal) -> Money {
        Money::from_decimal(d)
    }

    fn engine() -> AccrualEngine {
        let mut engine = AccrualEngine::new();
        // 10% on 1000 for a full year, repaid
        engine.create("B 2025-1", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        engine.apply_interest("B 2025-1", date(2026, 1, 1), money(dec!(100))).unwrap();
        engine.apply_principal_return("B 2025-1", date(2026, 1, 1), money(dec!(1000))).unwrap();
        // 4% on 3000 for a year, still outstanding, one fee
        engine.create("A 2025-2", money(dec!(-3000)), date(2025, 1, 1)).unwrap();
        engine.apply_interest("A 2025-2", date(2025, 12, 1), money(dec!(125))).unwrap();
        engine.apply_fee("A 2025-2", money(dec!(-5))).unwrap();
        engine
    }

    #[test]
    fn test_build_sorted_with_flags() {
        let report = AccountReport::build(&engine(), date(2026, 1, 1)).unwrap();

        assert_eq!(report.investments.len(), 2);
        let a = &report.investments[0];
        let b = &report.investments[1];
        assert_eq!(a.code, "A 2025-2");
        assert_eq!(b.code, "B 2025-1");

        assert_eq!(a.effective_rate.as_decimal(), dec!(0.04));
        assert!(a.rate_may_rise);
        assert_eq!(b.effective_rate.as_decimal(), dec!(0.1));
        assert!(!b.rate_may_rise);
        assert!(report.any_rate_may_rise());
    }

    #[test]
    fn test_totals_and_weighted_rate() {
        let report = AccountReport::build(&engine(), date(2026, 1, 1)).unwrap();
        let totals = &report.totals;

        assert_eq!(totals.initial_principal, money(dec!(4000)));
        assert_eq!(totals.interest, money(dec!(225)));
        assert_eq!(totals.fees, money(dec!(5)));
        assert_eq!(totals.balance, money(dec!(3000)));

        // (3000 × 0.04 + 1000 × 0.10) / 4000
        assert_abs_diff_eq!(totals.weighted_rate.to_f64(), 0.055, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_engine() {
        let report = AccountReport::build(&AccrualEngine::new(), date(2026, 1, 1)).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.totals, ReportTotals::default());
    }

    #[test]
    fn test_creation_day_aborts_report() {
        let mut engine = engine();
        engine.create("C 2026-1", money(dec!(-50)), date(2026, 1, 1)).unwrap();
        let err = AccountReport::build(&engine, date(2026, 1, 1)).unwrap_err();
        assert_eq!(err.exit_code(), 109);
    }
}
