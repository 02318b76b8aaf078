//! Implementation of the `lots-reset` command.

use crate::snapshot;
use anyhow::Result;
use clap::Parser;
use lotledger_engine::{Config, CostEngine};
use std::path::PathBuf;
use std::process::ExitCode;

/// Reverse a previous cost-of-sales calculation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger snapshot to operate on
    #[arg(value_name = "SNAPSHOT")]
    pub file: PathBuf,

    /// Inventory account id of the tracked good
    #[arg(short, long)]
    pub account: String,

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

    let mut engine =
        CostEngine::new(&mut snapshot.ledger, books).with_config(Config::default());
    let summary = engine.reset_cost_of_sales(&args.account)?;
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

/// Main entry point for the reset command.
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
