//! CLI command handling
//!
//! Merges configuration layers, wires up the harness, and formats output.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::{self, Config, RunSettings};
use crate::common::{Error, Result};
use crate::corpus;
use crate::exec::ProcessExecutor;
use crate::harness::Harness;
use crate::trace::TraceStore;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            oracle,
            candidate,
            corpus,
            trace_dir,
            pattern,
            timeout,
            jobs,
            json,
            config,
        } => {
            let config = Config::load_or_default(config.as_deref())?;
            let settings = merge_settings(
                config, oracle, candidate, corpus, trace_dir, pattern, timeout, jobs,
            )?;
            run(settings, json).await
        }

        Commands::List {
            corpus: corpus_root,
            pattern,
            config,
        } => {
            let config = Config::load_or_default(config.as_deref())?;
            let root = corpus_root
                .or(config.paths.corpus)
                .ok_or_else(|| missing("corpus directory", "--corpus", "corpus"))?;
            let pattern = pattern.unwrap_or(config.runner.pattern);

            let tests = corpus::discover(&root, &pattern)?;
            for test in &tests {
                println!("{}", test.name);
            }
            println!("{} test(s) in '{}'", tests.len(), root.display());
            Ok(())
        }

        Commands::Clean { trace_dir, config } => {
            let config = Config::load_or_default(config.as_deref())?;
            let trace_dir = trace_dir
                .or(config.paths.trace_dir)
                .unwrap_or_else(config::default_trace_dir);

            if !trace_dir.is_dir() {
                println!("Nothing to clean: '{}' does not exist", trace_dir.display());
                return Ok(());
            }

            let store = TraceStore::open(&trace_dir)?;
            let removed = store.clean_oracle()?;
            println!(
                "Removed {} cached oracle trace(s) from '{}'",
                removed,
                trace_dir.display()
            );
            Ok(())
        }
    }
}

/// Run the harness over the discovered corpus
async fn run(settings: RunSettings, json: bool) -> Result<()> {
    // Discovery errors are the only fatal ones; they fire before any test.
    let tests = corpus::discover(&settings.corpus, &settings.pattern)?;
    if tests.is_empty() {
        println!(
            "No tests matching '{}' under '{}'",
            settings.pattern,
            settings.corpus.display()
        );
        return Ok(());
    }

    let store = Arc::new(TraceStore::open(&settings.trace_dir)?);
    let oracle = Arc::new(ProcessExecutor::new(&settings.oracle, settings.timeout));
    let candidate = Arc::new(ProcessExecutor::new(&settings.candidate, settings.timeout));
    let harness = Harness::new(oracle, candidate, store);

    tracing::info!(
        tests = tests.len(),
        jobs = settings.jobs,
        oracle = %settings.oracle.display(),
        candidate = %settings.candidate.display(),
        "starting run"
    );

    let report = harness.run(tests, settings.jobs).await;

    println!("{}", report.summary.render());
    if report.summary.errors > 0 {
        println!(
            "{} {} test(s) skipped on harness errors (not counted above)",
            "Warning:".yellow().bold(),
            report.summary.errors
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Merge CLI flags over the config file over built-in defaults
#[allow(clippy::too_many_arguments)]
fn merge_settings(
    config: Config,
    oracle: Option<PathBuf>,
    candidate: Option<PathBuf>,
    corpus: Option<PathBuf>,
    trace_dir: Option<PathBuf>,
    pattern: Option<String>,
    timeout: Option<u64>,
    jobs: Option<usize>,
) -> Result<RunSettings> {
    let oracle = oracle
        .or(config.paths.oracle)
        .ok_or_else(|| missing("oracle executable", "--oracle", "oracle"))?;
    let candidate = candidate
        .or(config.paths.candidate)
        .ok_or_else(|| missing("candidate executable", "--candidate", "candidate"))?;
    let corpus = corpus
        .or(config.paths.corpus)
        .ok_or_else(|| missing("corpus directory", "--corpus", "corpus"))?;

    Ok(RunSettings {
        oracle: config::resolve_executable(&oracle)?,
        candidate: config::resolve_executable(&candidate)?,
        corpus,
        trace_dir: trace_dir
            .or(config.paths.trace_dir)
            .unwrap_or_else(config::default_trace_dir),
        pattern: pattern.unwrap_or(config.runner.pattern),
        timeout: timeout
            .or(config.runner.timeout_secs)
            .map(Duration::from_secs),
        jobs: jobs.unwrap_or(config.runner.jobs),
    })
}

fn missing(what: &str, flag: &str, key: &str) -> Error {
    Error::Config(format!(
        "No {what} configured. Pass {flag} or set '{key}' under [paths] in the config file"
    ))
}
