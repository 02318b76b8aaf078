//! Implementation of the `lots-calc` command.

use crate::snapshot;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use lotledger_engine::{Config, CostEngine};
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute cost of goods sold for one tracked good.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger snapshot to operate on
    #[arg(value_name = "SNAPSHOT")]
    pub file: PathBuf,

    /// Inventory account id of the tracked good
    #[arg(short, long)]
    pub account: String,

    /// Only consider sales up to this date (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Half-width of the additional-cost search window, in months
    #[arg(long, default_value_t = 3)]
    pub window_months: u32,

    /// Name of the financial-ledger COGS account
    #[arg(long, default_value = "Cost of goods sold")]
    pub cogs_account: String,

    /// Print the summary without writing the snapshot back
    #[arg(long)]
    pub dry_run: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut snapshot = snapshot::load(&args.file)?;
    let books = snapshot.books();
    let config = Config::default()
        .with_cost_window_months(args.window_months)
        .with_cogs_account(args.cogs_account.clone());

    let mut engine = CostEngine::new(&mut snapshot.ledger, books).with_config(config);
    let summary = engine.calculate_cost_of_sales(&args.account, args.as_of)?;
    println!("{summary}");

    if !args.dry_run {
        snapshot::save(&args.file, &snapshot)?;
    }

    if summary.error {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Main entry point for the calc command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        super::init_tracing();
    }
    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
