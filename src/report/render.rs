//! Text and JSON rendering of account reports

use std::io::{self, Write};

use super::summary::{AccountReport, InvestmentSummary};
use crate::ledger::{LedgerEvent, DATE_FORMAT};
use crate::money::Money;

const RULE: &str = "=======================================================================";

/// Whole dollars with thousands separators, e.g. `$12,346`
pub fn format_dollars(amount: Money) -> String {
    let rounded = amount.round_whole().as_decimal();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Write the summary table
pub fn write_table<W: Write>(report: &AccountReport, out: &mut W) -> io::Result<()> {
    if report.is_empty() {
        writeln!(out)?;
        writeln!(out, "No investments found as of {}.", report.as_of.format(DATE_FORMAT))?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Summary of effective interest rate for each investment in this account:")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "    Code      Initial P  Interest     Fees    Balance  Effective rate")?;
    writeln!(out, "{}", RULE)?;

    for line in &report.investments {
        writeln!(out, "{}", table_row(line))?;
    }

    let totals = &report.totals;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "{:>12}   {:>8}  {:>8}  {:>8}  {:>8}{:>12}",
        "",
        format_dollars(totals.initial_principal),
        format_dollars(totals.interest),
        format_dollars(totals.fees),
        format_dollars(totals.balance),
        totals.weighted_rate.to_string(),
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Mean effective rate {} is weighted by initial principal.",
        totals.weighted_rate
    )?;

    if report.any_rate_may_rise() {
        writeln!(out)?;
        writeln!(
            out,
            "* = effective rate will increase if interest is paid after {}.",
            report.as_of.format(DATE_FORMAT)
        )?;
    }
    Ok(())
}

fn table_row(line: &InvestmentSummary) -> String {
    format!(
        "{:>12}   {:>8}  {:>8}  {:>8}  {:>8}{:>12}{}",
        line.code,
        format_dollars(line.initial_principal),
        format_dollars(line.interest),
        format_dollars(line.fees),
        format_dollars(line.balance),
        line.effective_rate.to_string(),
        if line.rate_may_rise { " *" } else { "" },
    )
}

/// Write ledger rows the engine did not apply. Transfers to and from the
/// bank are left out unless `show_transfers` is set.
pub fn write_unhandled<W: Write>(
    rows: &[LedgerEvent],
    show_transfers: bool,
    out: &mut W,
) -> io::Result<()> {
    let mut shown = rows
        .iter()
        .filter(|row| show_transfers || !row.kind.is_transfer())
        .peekable();

    if shown.peek().is_some() {
        writeln!(out, "Unhandled CSV file row(s):")?;
        for row in shown {
            writeln!(out, "  {}", row)?;
        }
    }
    Ok(())
}

/// Write the report as pretty-printed JSON
pub fn write_json<W: Write>(report: &AccountReport, out: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out).map_err(serde_json::Error::io)
}
