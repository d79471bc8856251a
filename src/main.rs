//! Homies Ledger CLI
//!
//! Reads a CSV expense ledger and writes balances, settlements or spending
//! statistics as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv [balances|settlements|stats|monthly|expenses] [key=value...] > report.csv
//! ```
//!
//! The report defaults to `settlements`. Trailing `user=`, `category=`,
//! `from=` and `to=` arguments restrict the report to matching expenses;
//! `from` and `to` go together.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use homies_ledger::{ExpenseFilter, Ledger, LedgerError, Report, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let mut report = Report::default();
    let mut filter = ExpenseFilter::default();
    for arg in &args[2..] {
        if arg.contains('=') {
            filter.apply_arg(arg)?;
        } else {
            report = arg.parse::<Report>()?;
        }
    }

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut ledger = Ledger::new();
    ledger.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    ledger.write_filtered(report, &filter, handle)?;

    Ok(())
}
