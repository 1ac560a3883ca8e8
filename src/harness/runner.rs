//! Execution coordinator
//!
//! Per test: obtain the oracle trace (cache-first - the oracle is
//! deterministic and expensive), always obtain a fresh candidate trace,
//! persist both, classify the candidate trace. Tests are independent, so a
//! bounded worker pool processes them in parallel; results stream to the
//! reporter through a channel and the summary aggregates there, never in
//! shared counters.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::corpus::TestCase;
use crate::exec::{Capture, Executor};
use crate::harness::classify::{classify, Outcome};
use crate::harness::report::{RunReport, RunSummary, TestReport};
use crate::trace::TraceStore;
use crate::Result;

/// Drives the oracle and candidate executables over the test corpus
#[derive(Clone)]
pub struct Harness {
    oracle: Arc<dyn Executor>,
    candidate: Arc<dyn Executor>,
    store: Arc<TraceStore>,
}

impl Harness {
    pub fn new(
        oracle: Arc<dyn Executor>,
        candidate: Arc<dyn Executor>,
        store: Arc<TraceStore>,
    ) -> Self {
        Self {
            oracle,
            candidate,
            store,
        }
    }

    /// Run one test: cached-or-fresh oracle trace plus a fresh candidate
    /// capture, both persisted
    pub async fn run_one(&self, test: &TestCase) -> Result<(Vec<u8>, Capture)> {
        let oracle_trace = self.oracle_trace(test).await?;

        let capture = self.candidate.execute(&test.path).await?;
        if let Err(e) = self.store.store_candidate(&test.name, &capture.output) {
            tracing::warn!(
                test = %test.name,
                error = %e,
                "could not persist candidate trace, continuing with in-memory artifact"
            );
        }

        Ok((oracle_trace, capture))
    }

    // Cache-first: a hit must not invoke the oracle at all.
    async fn oracle_trace(&self, test: &TestCase) -> Result<Vec<u8>> {
        if let Some(bytes) = self.store.load_oracle(&test.name)? {
            tracing::debug!(test = %test.name, "oracle cache hit");
            return Ok(bytes);
        }

        let capture = self.oracle.execute(&test.path).await?;
        if let Err(e) = self.store.store_oracle(&test.name, &capture.output) {
            tracing::warn!(
                test = %test.name,
                error = %e,
                "could not persist oracle trace, continuing with in-memory artifact"
            );
        }
        Ok(capture.output)
    }

    /// Process one test to its terminal state
    ///
    /// Launch failures and cache-read errors become a per-test Error status;
    /// they never abort the batch.
    pub async fn process(&self, test: &TestCase) -> TestReport {
        match self.run_one(test).await {
            Ok((_oracle_trace, capture)) => {
                // A killed candidate may have emitted a marker before the
                // timeout fired; the kill is still a crash.
                let outcome = if capture.timed_out {
                    Outcome::Crash
                } else {
                    classify(&capture.output)
                };
                TestReport::outcome(&test.name, outcome)
            }
            Err(e) => TestReport::error(&test.name, e.to_string()),
        }
    }

    /// Run the whole corpus with a bounded worker pool, streaming each
    /// result to the console as it completes
    ///
    /// Ctrl-C aborts in-flight workers; spawned children are configured
    /// kill-on-drop so no simulator process is orphaned.
    pub async fn run(&self, corpus: Vec<TestCase>, jobs: usize) -> RunReport {
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<TestReport>();
        let mut workers = JoinSet::new();

        for test in corpus {
            let harness = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            workers.spawn(async move {
                // The semaphore lives as long as the pool; acquire only
                // fails after close, which never happens here.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let _ = tx.send(harness.process(&test).await);
            });
        }
        drop(tx);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut summary = RunSummary::default();
        let mut results = Vec::new();
        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(report) => {
                        report.print();
                        summary.record(&report.status);
                        results.push(report);
                    }
                    None => break,
                },
                _ = &mut ctrl_c => {
                    tracing::warn!("interrupted, terminating in-flight simulators");
                    workers.abort_all();
                    break;
                }
            }
        }

        while workers.join_next().await.is_some() {}

        RunReport { summary, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CannedExecutor, FailingExecutor};
    use crate::harness::report::TestStatus;

    fn store() -> (tempfile::TempDir, Arc<TraceStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TraceStore::open(dir.path()).unwrap());
        (dir, store)
    }

    fn test_case(name: &str) -> TestCase {
        // Canned executors never touch the path
        TestCase::new(name, format!("/corpus/{name}"))
    }

    #[tokio::test]
    async fn test_oracle_invoked_at_most_once_per_name() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle trace"[..]));
        let candidate = Arc::new(CannedExecutor::new(&b"RISCV_TEST_PASS"[..]));
        let harness = Harness::new(oracle.clone(), candidate.clone(), store);

        let test = test_case("rv64ui-p-add");
        harness.run_one(&test).await.unwrap();
        harness.run_one(&test).await.unwrap();

        assert_eq!(oracle.calls(), 1);
        assert_eq!(candidate.calls(), 2);
    }

    #[tokio::test]
    async fn test_prepopulated_cache_skips_oracle_entirely() {
        let (_dir, store) = store();
        store.store_oracle("rv64ui-p-add", b"cached").unwrap();

        let oracle = Arc::new(CannedExecutor::new(&b"fresh"[..]));
        let candidate = Arc::new(CannedExecutor::new(&b"RISCV_TEST_PASS"[..]));
        let harness = Harness::new(oracle.clone(), candidate, store);

        let (oracle_trace, _) = harness.run_one(&test_case("rv64ui-p-add")).await.unwrap();
        assert_eq!(oracle_trace, b"cached");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_candidate_trace_recomputed_every_run() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle"[..]));
        let candidate = Arc::new(CannedExecutor::new(&b"RISCV_TEST_FAIL"[..]));
        let harness = Harness::new(oracle, candidate, store.clone());

        let test = test_case("rv64ui-p-add");
        harness.run_one(&test).await.unwrap();
        std::fs::remove_file(store.candidate_path(&test.name)).unwrap();
        harness.run_one(&test).await.unwrap();

        assert!(store.candidate_path(&test.name).is_file());
    }

    #[tokio::test]
    async fn test_timeout_classifies_as_crash() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle"[..]));
        // Marker made it out before the kill; the kill still wins
        let candidate = Arc::new(CannedExecutor::new(&b"RISCV_TEST_PASS"[..]).timing_out());
        let harness = Harness::new(oracle, candidate, store);

        let report = harness.process(&test_case("rv64ui-p-add")).await;
        match report.status {
            TestStatus::Outcome { outcome } => assert_eq!(outcome, Outcome::Crash),
            other => panic!("Expected outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_failure_is_error_not_crash() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle"[..]));
        let harness = Harness::new(oracle, Arc::new(FailingExecutor), store);

        let report = harness.process(&test_case("rv64ui-p-add")).await;
        assert!(matches!(report.status, TestStatus::Error { .. }));
    }

    #[tokio::test]
    async fn test_run_aggregates_summary_across_pool() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle"[..]));
        let candidate = Arc::new(CannedExecutor::new(&b"RISCV_TEST_PASS"[..]));
        let harness = Harness::new(oracle, candidate, store);

        let corpus = vec![
            test_case("rv64ui-p-add"),
            test_case("rv64ui-p-sub"),
            test_case("rv64ui-p-xor"),
        ];
        let report = harness.run(corpus, 4).await;

        assert_eq!(report.summary.passed, 3);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.results.len(), 3);
    }

    #[tokio::test]
    async fn test_run_continues_past_per_test_errors() {
        let (_dir, store) = store();
        let oracle = Arc::new(CannedExecutor::new(&b"oracle"[..]));
        let harness = Harness::new(oracle, Arc::new(FailingExecutor), store);

        let corpus = vec![test_case("rv64ui-p-add"), test_case("rv64ui-p-sub")];
        let report = harness.run(corpus, 1).await;

        assert_eq!(report.summary.errors, 2);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.results.len(), 2);
    }
}
