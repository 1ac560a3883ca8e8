//! Test-corpus discovery
//!
//! Enumerates candidate test binaries under a root directory. Disassembly
//! listings (`.dump`) and directories are excluded even when their names
//! match the pattern; nested directories sharing a test-name prefix are a
//! real hazard in riscv-tests build trees.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Suffix marking a derived disassembly listing, never a runnable test
const DUMP_SUFFIX: &str = ".dump";

/// One discovered test binary
///
/// Immutable once discovered; the name is the binary's base filename and
/// keys the trace artifacts on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub path: PathBuf,
}

impl TestCase {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Discover the test corpus under `root`, filtered by a `*`-wildcard pattern
///
/// Read-only traversal of the immediate directory entries. The result is
/// sorted by name so repeated scans of an unchanged tree report in a stable
/// order; correctness never depends on ordering.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<TestCase>> {
    if !root.is_dir() {
        return Err(Error::CorpusNotFound(root.to_path_buf()));
    }

    let entries = std::fs::read_dir(root).map_err(|e| Error::CorpusUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut tests = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::CorpusUnreadable {
            path: root.to_path_buf(),
            source: e,
        })?;

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            // Non-UTF-8 names cannot come out of the riscv-tests build
            Err(_) => continue,
        };

        if !matches_pattern(pattern, &name) || name.ends_with(DUMP_SUFFIX) {
            continue;
        }
        if entry.path().is_dir() {
            continue;
        }

        tests.push(TestCase::new(name, entry.path()));
    }

    tests.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = tests.len(), "discovered test corpus");
    Ok(tests)
}

/// Match a file name against a `*`-wildcard pattern
///
/// `*` matches any run of characters (including empty); all other characters
/// match literally. This is the subset of glob syntax the riscv-tests corpus
/// needs (e.g. `rv64*-p-*`).
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    fn matches(p: &[u8], n: &[u8]) -> bool {
        match (p.first(), n.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                matches(&p[1..], n) || (!n.is_empty() && matches(p, &n[1..]))
            }
            (Some(pc), Some(nc)) if pc == nc => matches(&p[1..], &n[1..]),
            _ => false,
        }
    }
    matches(pattern.as_bytes(), name.as_bytes())
}
