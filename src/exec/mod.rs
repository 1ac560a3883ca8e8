//! Executable invocation abstraction
//!
//! The oracle and candidate simulators are opaque to the harness: the only
//! capability it needs is "execute against a test binary, hand back the
//! captured output and exit status". Putting a trait at that seam keeps the
//! coordinator and classifier testable without real simulator builds.

mod process;

pub use process::ProcessExecutor;

use async_trait::async_trait;
use std::path::Path;

use crate::common::Result;

/// Captured result of one executable run
#[derive(Debug, Clone)]
pub struct Capture {
    /// Combined standard-output and standard-error bytes
    pub output: Vec<u8>,
    /// Exit code if the process exited normally
    pub exit_code: Option<i32>,
    /// Whether the process was killed after exceeding the timeout
    pub timed_out: bool,
}

/// One executable invoked as `<exe> <test_binary_path>`
///
/// A nonzero exit status is a normal outcome and must not surface as an
/// error; only a failure to launch does.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, test_path: &Path) -> Result<Capture>;
}

/// Test double returning canned output, counting invocations
#[cfg(test)]
pub struct CannedExecutor {
    output: Vec<u8>,
    exit_code: Option<i32>,
    timed_out: bool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl CannedExecutor {
    pub fn new(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            exit_code: Some(0),
            timed_out: false,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn timing_out(mut self) -> Self {
        self.timed_out = true;
        self.exit_code = None;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl Executor for CannedExecutor {
    async fn execute(&self, _test_path: &Path) -> Result<Capture> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Capture {
            output: self.output.clone(),
            exit_code: self.exit_code,
            timed_out: self.timed_out,
        })
    }
}

/// Test double that fails to launch, mimicking a missing binary
#[cfg(test)]
pub struct FailingExecutor;

#[cfg(test)]
#[async_trait]
impl Executor for FailingExecutor {
    async fn execute(&self, _test_path: &Path) -> Result<Capture> {
        Err(crate::common::Error::launch(
            Path::new("/no/such/simulator"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        ))
    }
}
