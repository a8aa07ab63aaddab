//! Real Interest CLI
//!
//! Reads an account's transaction history and prints, for each investment,
//! the effective annual interest rate earned as of a date (today by default).

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use real_interest::exit::exit_status;
use real_interest::ledger::parse_date;
use real_interest::report::{write_json, write_table, write_unhandled};
use real_interest::ScenarioRunner;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Effective interest rate of each investment in an account's transaction history
#[derive(Parser)]
#[command(name = "real_interest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Transaction history CSV, newest transactions first
    file: PathBuf,

    /// Date as of which the rates are computed, e.g. 2024-02-16 (default: today)
    as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Also list bank deposits and withdrawals among unhandled rows
    #[arg(long)]
    show_transfers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
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
    let as_of = match &cli.as_of {
        Some(value) => parse_date(value)?,
        None => today(),
    };

    let runner = ScenarioRunner::from_path(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let result = runner
        .run(as_of)
        .with_context(|| format!("computing rates as of {}", as_of))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Table => {
            write_unhandled(&result.replay.unhandled, cli.show_transfers, &mut out)?;
            write_table(&result.report, &mut out)?;
        }
        OutputFormat::Json => write_json(&result.report, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
