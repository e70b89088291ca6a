//! Style diagnostics CLI
//!
//! Runs the diagnostic checks of one styling exercise and prints which
//! seeded defects are still present.

use clap::Parser;
use commands::Commands;
use style_diag::common::logging;
use style_diag::{cli, commands};

#[derive(Parser)]
#[command(name = "style-diag", about = "Diagnostic tests for styling exercises")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
