//! Real subprocess executor
//!
//! Spawns `<exe> <test_binary_path>` with piped output, drains stdout and
//! stderr concurrently while the child runs (large traces would otherwise
//! deadlock on pipe backpressure), and enforces an optional wall-clock
//! timeout by killing the child.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::common::{Error, Result};

use super::{Capture, Executor};

/// Executor launching a real simulator binary per test
pub struct ProcessExecutor {
    exe: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(exe: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            exe: exe.into(),
            timeout,
        }
    }

    /// Kill the child's whole process group so simulator-spawned helpers
    /// don't outlive the test
    #[cfg(unix)]
    fn kill_group(child: &Child) {
        if let Some(pid) = child.id() {
            unsafe {
                libc::kill(-(pid as i32), libc::SIGKILL);
            }
        }
    }

    #[cfg(not(unix))]
    fn kill_group(_child: &Child) {}
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(&self, test_path: &Path) -> Result<Capture> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg(test_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        tracing::debug!(exe = %self.exe.display(), test = %test_path.display(), "spawning");

        let mut child = cmd.spawn().map_err(|e| Error::launch(&self.exe, e))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::OutputCapture(self.exe.clone()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::OutputCapture(self.exe.clone()))?;

        // Drain both pipes while the child runs. The readers hit EOF once the
        // child exits or is killed, so awaiting them after wait() cannot hang.
        let drain = tokio::spawn(async move {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let _ = join(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err)).await;
            out.extend_from_slice(&err);
            out
        });

        let (exit_code, timed_out) = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => (status?.code(), false),
                Err(_) => {
                    tracing::warn!(
                        exe = %self.exe.display(),
                        test = %test_path.display(),
                        timeout_secs = limit.as_secs(),
                        "child exceeded timeout, killing"
                    );
                    Self::kill_group(&child);
                    let _ = child.kill().await;
                    let _ = child.wait().await;
                    (None, true)
                }
            },
            None => (child.wait().await?.code(), false),
        };

        let output = drain.await.unwrap_or_default();

        Ok(Capture {
            output,
            exit_code,
            timed_out,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // Invoking `/bin/sh <script_path>` fits the `<exe> <test_path>` contract,
    // so shell scripts stand in for test binaries without a chmod dance.
    fn script(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_captures_combined_output_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let test = script(&dir, "emit", "echo OUT\necho ERR >&2\nexit 3\n");

        let exec = ProcessExecutor::new("/bin/sh", None);
        let capture = exec.execute(&test).await.unwrap();

        let text = String::from_utf8_lossy(&capture.output);
        assert!(text.contains("OUT"));
        assert!(text.contains("ERR"));
        assert_eq!(capture.exit_code, Some(3));
        assert!(!capture.timed_out);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let test = script(&dir, "fail", "exit 42\n");

        let exec = ProcessExecutor::new("/bin/sh", None);
        let capture = exec.execute(&test).await.unwrap();
        assert_eq!(capture.exit_code, Some(42));
    }

    #[tokio::test]
    async fn test_timeout_kills_and_keeps_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let test = script(&dir, "hang", "echo PARTIAL\nsleep 30\n");

        let exec = ProcessExecutor::new("/bin/sh", Some(Duration::from_millis(500)));
        let capture = exec.execute(&test).await.unwrap();

        assert!(capture.timed_out);
        assert!(capture.exit_code.is_none());
        let text = String::from_utf8_lossy(&capture.output);
        assert!(text.contains("PARTIAL"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_launch_error() {
        let exec = ProcessExecutor::new("/no/such/simulator", None);
        let result = exec.execute(Path::new("whatever")).await;
        assert!(matches!(result, Err(Error::Launch { .. })));
    }
}
