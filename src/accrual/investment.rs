//! Accrual state for a single investment

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use super::error::{AccrualError, Result};
use crate::ledger::DATE_FORMAT;
use crate::money::{Money, Rate};

/// Length of the accrual year in days
pub const DAYS_PER_YEAR: i64 = 365;

/// Outstanding balance above which an investment still earns interest
const OUTSTANDING_THRESHOLD: Decimal = Decimal::from_parts(99, 0, 0, false, 2);

/// State of one investment after the ledger events applied so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Investment {
    /// Investment code, e.g. "PBN6 2023-1"
    code: String,

    /// Principal paid in at creation, stored positive
    initial_principal: Money,

    /// Outstanding principal
    balance: Money,

    /// Date of the last balance change (creation or return of principal)
    balance_changed_at: NaiveDate,

    /// Date of the last interest payment, or creation if none yet
    interest_touched_at: NaiveDate,

    /// Σ balance × days held up to `balance_changed_at` (money·days)
    principal_days: Decimal,

    /// Interest received to date
    cumulative_interest: Money,

    /// Fees paid to date, stored positive
    cumulative_fees: Money,
}

impl Investment {
    /// Open an investment from its ledger entry; `amount` is the signed
    /// ledger value, so money paid in arrives negative.
    pub(crate) fn open(code: &str, amount: Money, date: NaiveDate) -> Result<Self> {
        if !amount.is_negative() {
            return Err(invalid_amount(
                code,
                amount,
                "amount invested must be negative in the ledger",
            ));
        }
        if !amount.is_whole_cents() {
            return Err(invalid_amount(code, amount, "amounts must be given in whole cents"));
        }

        let principal = -amount;
        Ok(Self {
            code: code.to_string(),
            initial_principal: principal,
            balance: principal,
            balance_changed_at: date,
            interest_touched_at: date,
            principal_days: Decimal::ZERO,
            cumulative_interest: Money::ZERO,
            cumulative_fees: Money::ZERO,
        })
    }

    /// Apply a (possibly partial) return of principal.
    ///
    /// The integral is advanced with the balance held before the return, then
    /// the balance drops. A balance below zero is not rejected.
    pub(crate) fn return_principal(&mut self, date: NaiveDate, returned: Money) -> Result<()> {
        if returned.is_negative() {
            return Err(invalid_amount(
                &self.code,
                returned,
                "principal returned must be given as a nonnegative number",
            ));
        }
        if date < self.balance_changed_at {
            return Err(AccrualError::OutOfOrderEvent {
                code: self.code.clone(),
                date,
                last_change: self.balance_changed_at,
            });
        }

        self.principal_days += self.balance_days_until(date);
        self.balance_changed_at = date;
        self.balance -= returned;
        Ok(())
    }

    /// Apply a fee; the ledger carries fees as negative amounts
    pub(crate) fn charge_fee(&mut self, fee: Money) -> Result<()> {
        if !fee.is_negative() {
            return Err(invalid_amount(
                &self.code,
                fee,
                "fees must be given as a negative number",
            ));
        }
        self.cumulative_fees += fee.abs();
        Ok(())
    }

    pub(crate) fn pay_interest(&mut self, date: NaiveDate, interest: Money) {
        self.cumulative_interest += interest;
        self.interest_touched_at = date;
    }

    /// Effective annual rate earned through `as_of`:
    /// (interest − fees) / ∫ balance dt, with the integral projected to `as_of`
    /// at the current balance.
    pub fn effective_rate(&self, as_of: NaiveDate) -> Result<Rate> {
        let projected = self.projected_principal_days(as_of)?;
        if projected.is_zero() {
            return Err(AccrualError::ZeroExposure {
                code: self.code.clone(),
                as_of,
            });
        }

        let net = (self.cumulative_interest - self.cumulative_fees).as_decimal();
        Ok(Rate::from_decimal(net * Decimal::from(DAYS_PER_YEAR) / projected))
    }

    /// ∫ balance dt from creation through `as_of`, in money·years
    pub fn projected_principal_time(&self, as_of: NaiveDate) -> Result<Decimal> {
        Ok(self.projected_principal_days(as_of)? / Decimal::from(DAYS_PER_YEAR))
    }

    fn projected_principal_days(&self, as_of: NaiveDate) -> Result<Decimal> {
        if as_of < self.balance_changed_at {
            return Err(AccrualError::StaleQuery {
                code: self.code.clone(),
                as_of,
                last_change: self.balance_changed_at,
            });
        }
        Ok(self.principal_days + self.balance_days_until(as_of))
    }

    /// Current balance × days elapsed since the last balance change
    fn balance_days_until(&self, date: NaiveDate) -> Decimal {
        let days = (date - self.balance_changed_at).num_days();
        self.balance.as_decimal() * Decimal::from(days)
    }

    /// True when principal is still outstanding and no interest was paid on
    /// `as_of` itself, so interest accrued since the last payment is not yet
    /// reflected in the rate.
    pub fn rate_may_rise(&self, as_of: NaiveDate) -> bool {
        self.balance.as_decimal() > OUTSTANDING_THRESHOLD && self.interest_touched_at < as_of
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn initial_principal(&self) -> Money {
        self.initial_principal
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn balance_changed_at(&self) -> NaiveDate {
        self.balance_changed_at
    }

    pub fn interest_touched_at(&self) -> NaiveDate {
        self.interest_touched_at
    }

    /// ∫ balance dt up to the last balance change, in money·years
    pub fn principal_time_integral(&self) -> Decimal {
        self.principal_days / Decimal::from(DAYS_PER_YEAR)
    }

    pub fn cumulative_interest(&self) -> Money {
        self.cumulative_interest
    }

    pub fn cumulative_fees(&self) -> Money {
        self.cumulative_fees
    }
}

fn invalid_amount(code: &str, amount: Money, reason: &'static str) -> AccrualError {
    AccrualError::InvalidAmount {
        code: code.to_string(),
        amount,
        reason,
    }
}

impl fmt::Display for Investment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Investment: {}, outstanding principal {}, balance changed {}, \
             total interest and fees: {}, {}, Σ principal·time = {:.2} ($·years)",
            self.code,
            self.balance,
            self.balance_changed_at.format(DATE_FORMAT),
            self.cumulative_interest,
            self.cumulative_fees,
            self.principal_time_integral().round_dp(2),
        )
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

    #[test]
    fn test_open_negates_ledger_amount() {
        let inv = Investment::open("A", money(dec!(-1000.00)), date(2024, 1, 1)).unwrap();
        assert_eq!(inv.initial_principal(), money(dec!(1000)));
        assert_eq!(inv.balance(), money(dec!(1000)));
        assert_eq!(inv.balance_changed_at(), date(2024, 1, 1));
        assert_eq!(inv.interest_touched_at(), date(2024, 1, 1));
        assert_eq!(inv.principal_time_integral(), Decimal::ZERO);
    }

    #[test]
    fn test_open_rejects_bad_amounts() {
        for amount in [dec!(1000), dec!(0), dec!(-10.005)] {
            let err = Investment::open("A", money(amount), date(2024, 1, 1)).unwrap_err();
            assert!(matches!(err, AccrualError::InvalidAmount { .. }), "{amount}: {err}");
        }
    }

    #[test]
    fn test_return_uses_balance_before_change() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.return_principal(date(2025, 4, 11), money(dec!(400))).unwrap(); // 100 days

        assert_eq!(inv.balance(), money(dec!(600)));
        assert_eq!(inv.balance_changed_at(), date(2025, 4, 11));
        assert_eq!(inv.principal_time_integral(), dec!(100000) / dec!(365));
    }

    #[test]
    fn test_return_out_of_order() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.return_principal(date(2025, 3, 1), money(dec!(100))).unwrap();
        let before = inv.clone();

        let err = inv.return_principal(date(2025, 2, 1), money(dec!(100))).unwrap_err();
        assert_eq!(
            err,
            AccrualError::OutOfOrderEvent {
                code: "A".to_string(),
                date: date(2025, 2, 1),
                last_change: date(2025, 3, 1),
            }
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_negative_return_rejected() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        let err = inv.return_principal(date(2025, 2, 1), money(dec!(-1))).unwrap_err();
        assert!(matches!(err, AccrualError::InvalidAmount { .. }));
    }

    #[test]
    fn test_overpayment_is_not_rejected() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.return_principal(date(2025, 2, 1), money(dec!(1000.01))).unwrap();
        assert_eq!(inv.balance(), money(dec!(-0.01)));
    }

    #[test]
    fn test_fee_sign() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.charge_fee(money(dec!(-2.50))).unwrap();
        assert_eq!(inv.cumulative_fees(), money(dec!(2.50)));
        assert!(inv.charge_fee(money(dec!(2.50))).is_err());
        assert!(inv.charge_fee(Money::ZERO).is_err());
        assert_eq!(inv.cumulative_fees(), money(dec!(2.50)));
    }

    #[test]
    fn test_rate_for_one_year_hold() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.pay_interest(date(2026, 1, 1), money(dec!(50)));
        inv.return_principal(date(2026, 1, 1), money(dec!(1000))).unwrap();

        let rate = inv.effective_rate(date(2026, 1, 1)).unwrap();
        assert_eq!(rate.as_decimal(), dec!(0.05));

        // Fully repaid: later query dates add nothing to the integral
        assert_eq!(inv.effective_rate(date(2027, 6, 1)).unwrap(), rate);
    }

    #[test]
    fn test_rate_across_leap_year() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2024, 1, 1)).unwrap();
        inv.pay_interest(date(2025, 1, 1), money(dec!(50)));
        inv.return_principal(date(2025, 1, 1), money(dec!(1000))).unwrap();

        // 366 days held under a 365-day year
        let rate = inv.effective_rate(date(2025, 1, 1)).unwrap();
        assert_abs_diff_eq!(rate.to_f64(), 50.0 / (1000.0 * 366.0 / 365.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rate_is_net_of_fees_and_projects_balance() {
        let mut inv = Investment::open("A", money(dec!(-2000)), date(2025, 1, 1)).unwrap();
        inv.pay_interest(date(2025, 7, 1), money(dec!(40)));
        inv.charge_fee(money(dec!(-4))).unwrap();

        // Still outstanding: integral extends to the query date at the current balance
        let as_of = date(2025, 7, 20); // 200 days
        let rate = inv.effective_rate(as_of).unwrap();
        assert_abs_diff_eq!(rate.to_f64(), 36.0 / (2000.0 * 200.0 / 365.0), epsilon = 1e-12);
        assert_eq!(inv.projected_principal_time(as_of).unwrap(), dec!(400000) / dec!(365));

        // The projection is not stored
        assert_eq!(inv.principal_time_integral(), Decimal::ZERO);
    }

    #[test]
    fn test_stale_query() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.return_principal(date(2025, 6, 1), money(dec!(500))).unwrap();

        let err = inv.effective_rate(date(2025, 5, 31)).unwrap_err();
        assert_eq!(err.exit_code(), 108);
    }

    #[test]
    fn test_zero_exposure_on_creation_date() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        let err = inv.effective_rate(date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, AccrualError::ZeroExposure { .. }));

        // Same outcome regardless of cash received that day
        inv.pay_interest(date(2025, 1, 1), money(dec!(5)));
        let err = inv.effective_rate(date(2025, 1, 1)).unwrap_err();
        assert_eq!(err.exit_code(), 109);
    }

    #[test]
    fn test_rate_may_rise() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        assert!(inv.rate_may_rise(date(2025, 2, 1)));

        inv.pay_interest(date(2025, 2, 1), money(dec!(8)));
        assert!(!inv.rate_may_rise(date(2025, 2, 1)));
        assert!(inv.rate_may_rise(date(2025, 2, 2)));

        inv.return_principal(date(2025, 3, 1), money(dec!(999.01))).unwrap();
        assert!(!inv.rate_may_rise(date(2025, 4, 1)));
    }

    #[test]
    fn test_display() {
        let inv = Investment::open("PBN6 2023-1", money(dec!(-1000)), date(2024, 1, 1)).unwrap();
        let text = inv.to_string();
        assert!(text.starts_with("Investment: PBN6 2023-1, outstanding principal 1000.00"));
        assert!(text.contains("balance changed 2024-01-01"));
    }

    #[test]
    fn test_display_rounds_principal_time() {
        let mut inv = Investment::open("A", money(dec!(-1000)), date(2025, 1, 1)).unwrap();
        inv.return_principal(date(2025, 1, 2), money(dec!(1000))).unwrap();

        // 1000 / 365 = 2.7397...
        assert!(inv.to_string().ends_with("Σ principal·time = 2.74 ($·years)"));
    }
}
