//! Effective rate history of an account
//!
//! Replays the transaction history as of a series of dates (in parallel) and
//! prints the principal-weighted effective rate and totals for each date.
//! Supports JSON output for further processing via --json

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use real_interest::exit::exit_status;
use real_interest::ledger::parse_date;
use real_interest::report::format_dollars;
use real_interest::{AccountReport, ScenarioRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Weighted effective rate of an account over a series of as-of dates
#[derive(Parser)]
#[command(name = "rate_history")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Transaction history CSV, newest transactions first
    file: PathBuf,

    /// First as-of date (default: day after the oldest transaction)
    #[arg(long)]
    from: Option<String>,

    /// Last as-of date (default: today)
    #[arg(long)]
    to: Option<String>,

    /// Days between as-of dates
    #[arg(long, default_value_t = 30)]
    every_days: u32,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct HistoryResponse {
    points: Vec<HistoryPoint>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct HistoryPoint {
    as_of: NaiveDate,
    investments: usize,
    #[serde(flatten)]
    totals: real_interest::report::ReportTotals,
}

impl From<&AccountReport> for HistoryPoint {
    fn from(report: &AccountReport) -> Self {
        Self {
            as_of: report.as_of,
            investments: report.investments.len(),
            totals: report.totals.clone(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let status = exit_status(&err);
            eprintln!("ERROR: {:#}", err);
            if status > 1 {
                eprintln!("ERROR CODE = {}", status);
            }
            ExitCode::from(status)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let runner = ScenarioRunner::from_path(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let to = match &cli.to {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };
    let from = match (&cli.from, runner.first_date()) {
        (Some(value), _) => parse_date(value)?,
        (None, Some(first)) => first.succ_opt().unwrap_or(first),
        (None, None) => to,
    };

    let dates = ScenarioRunner::date_range(from, to, cli.every_days);
    log::info!(
        "Replaying {} ledger rows as of {} dates",
        runner.events().len(),
        dates.len()
    );

    let reports = runner.run_dates(&dates).context("computing rate history")?;
    let points: Vec<HistoryPoint> = reports.iter().map(HistoryPoint::from).collect();

    if cli.json {
        let response = HistoryResponse {
            points,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{:>10} {:>5} {:>10} {:>10} {:>8} {:>10} {:>9}",
        "As of", "Inv", "Principal", "Interest", "Fees", "Balance", "Rate"
    );
    println!("{}", "-".repeat(68));
    for point in &points {
        println!(
            "{:>10} {:>5} {:>10} {:>10} {:>8} {:>10} {:>9}",
            point.as_of.to_string(),
            point.investments,
            format_dollars(point.totals.initial_principal),
            format_dollars(point.totals.interest),
            format_dollars(point.totals.fees),
            format_dollars(point.totals.balance),
            point.totals.weighted_rate.to_string(),
        );
    }
    println!("\n{} dates in {:?}", points.len(), start.elapsed());
    Ok(())
}
