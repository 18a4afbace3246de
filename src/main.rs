//! SplitPay CLI
//!
//! Command-line interface for settling shared group expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv > settlements.csv
//! cargo run -- --strategy sync --report balances ledger.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 ledger.csv
//! RUST_LOG=debug cargo run -- --report summary ledger.csv
//! ```
//!
//! The program reads ledger records from the input CSV file, applies them to
//! each group, and writes the requested report to stdout. Diagnostics go to
//! stderr, filtered by `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output failure, etc.)

use splitpay_engine::cli;
use splitpay_engine::strategy;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, args.report, &mut output) {
        tracing::error!(error = %e, "Processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
