//! RV-Conform - a conformance-test harness for RISC-V simulators
//!
//! Runs a candidate simulator against a corpus of compiled test binaries,
//! reusing cached runs of a trusted reference simulator, and judges each test
//! from sentinel markers in the captured output.

use clap::Parser;
use rv_conform::commands::Commands;
use rv_conform::{cli, common};

#[derive(Parser)]
#[command(name = "rv-conform", about = "Conformance-test harness for RISC-V simulators")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
