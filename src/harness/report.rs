//! Per-test reporting and run summary
//!
//! Results stream to the console as each test completes so long runs show
//! live progress; the summary aggregates at the end. Launch errors are kept
//! out of the summary denominator - they mean the harness never judged the
//! candidate, which must read differently from a candidate crash.

use colored::Colorize;
use serde::Serialize;

use crate::harness::classify::Outcome;

/// Terminal state of one test within a run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestStatus {
    /// Candidate executed and was classified
    Outcome { outcome: Outcome },
    /// Harness-level error for this test (e.g. executable failed to spawn)
    Error { message: String },
}

/// One test's reported result
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub name: String,
    #[serde(flatten)]
    pub status: TestStatus,
}

impl TestReport {
    pub fn outcome(name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Outcome { outcome },
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Error {
                message: message.into(),
            },
        }
    }

    /// Print this result as one console line
    pub fn print(&self) {
        match &self.status {
            TestStatus::Outcome { outcome } => {
                let label = match outcome {
                    Outcome::Pass => outcome.label().green(),
                    Outcome::Fail => outcome.label().red(),
                    Outcome::Crash => outcome.label().red().bold(),
                };
                println!("Running {}... {}", self.name, label);
            }
            TestStatus::Error { message } => {
                println!(
                    "Running {}... {} {}",
                    self.name,
                    "Error:".yellow().bold(),
                    message
                );
            }
        }
    }
}

/// Aggregate counters for one harness invocation; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Tests classified Pass
    pub passed: usize,
    /// Tests that executed and were classified (the summary denominator)
    pub total: usize,
    /// Tests skipped on harness-level errors, excluded from the denominator
    pub errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, status: &TestStatus) {
        match status {
            TestStatus::Outcome { outcome } => {
                self.total += 1;
                if *outcome == Outcome::Pass {
                    self.passed += 1;
                }
            }
            TestStatus::Error { .. } => self.errors += 1,
        }
    }

    /// The final summary line
    pub fn render(&self) -> String {
        format!(
            "Summary: {} out of {} tests passed",
            self.passed, self.total
        )
    }
}

/// Full result of one harness invocation
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub results: Vec<TestReport>,
}
