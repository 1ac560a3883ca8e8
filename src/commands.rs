//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the candidate simulator against the test corpus
    Run {
        /// Path to the reference (oracle) simulator executable
        #[arg(long)]
        oracle: Option<PathBuf>,

        /// Path to the candidate simulator executable
        #[arg(long)]
        candidate: Option<PathBuf>,

        /// Root directory containing the compiled test binaries
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Directory for captured trace artifacts (created if missing)
        #[arg(long)]
        trace_dir: Option<PathBuf>,

        /// Wildcard pattern selecting test names (e.g. "rv64*-p-*")
        #[arg(long)]
        pattern: Option<String>,

        /// Per-test wall-clock timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Number of tests to run in parallel
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Emit a machine-readable JSON summary after the run
        #[arg(long)]
        json: bool,

        /// Use a specific configuration file instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the discovered test corpus without running anything
    List {
        /// Root directory containing the compiled test binaries
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Wildcard pattern selecting test names
        #[arg(long)]
        pattern: Option<String>,

        /// Use a specific configuration file instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete cached oracle traces so the next run re-executes the oracle
    Clean {
        /// Directory holding the trace artifacts
        #[arg(long)]
        trace_dir: Option<PathBuf>,

        /// Use a specific configuration file instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
