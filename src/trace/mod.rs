//! Trace artifact storage
//!
//! A key-value store over the trace directory: key is the test name, value
//! is the raw captured output of one executable run. Oracle traces act as a
//! cache (computed at most once per name until cleaned); candidate traces
//! are rewritten on every run for post-hoc inspection.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// File suffix for cached oracle traces
const ORACLE_SUFFIX: &str = "oracle";
/// File suffix for candidate traces
const CANDIDATE_SUFFIX: &str = "candidate";

/// File-backed store for oracle and candidate trace artifacts
#[derive(Debug)]
pub struct TraceStore {
    dir: PathBuf,
}

impl TraceStore {
    /// Open the store, creating the trace directory if absent (idempotent)
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached oracle trace for a test name
    pub fn oracle_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{ORACLE_SUFFIX}"))
    }

    /// Path of the candidate trace for a test name
    pub fn candidate_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{CANDIDATE_SUFFIX}"))
    }

    /// Read the cached oracle trace, or None on a cache miss
    pub fn load_oracle(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.oracle_path(name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::cache_read(&path, e)),
        }
    }

    /// Persist an oracle trace under its cache key
    pub fn store_oracle(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.write_atomic(&self.oracle_path(name), bytes)
    }

    /// Persist a candidate trace, overwriting any previous run's artifact
    pub fn store_candidate(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.write_atomic(&self.candidate_path(name), bytes)
    }

    /// Delete all cached oracle traces, returning how many were removed
    ///
    /// The manual invalidation path: the cache is never invalidated
    /// automatically, so a rebuilt corpus needs an explicit clean.
    pub fn clean_oracle(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ORACLE_SUFFIX)
                && path.is_file()
            {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    // Write via a temp file in the same directory plus rename, so a torn
    // write is never observable as a cache hit.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::cache_write(path, e))?;
        tmp.write_all(bytes)
            .map_err(|e| Error::cache_write(path, e))?;
        tmp.persist(path)
            .map_err(|e| Error::cache_write(path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces");
        TraceStore::open(&path).unwrap();
        TraceStore::open(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_oracle_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(dir.path()).unwrap();

        assert_eq!(store.load_oracle("rv64ui-p-add").unwrap(), None);
        store.store_oracle("rv64ui-p-add", b"cycle 0: pc=0x80000000").unwrap();
        assert_eq!(
            store.load_oracle("rv64ui-p-add").unwrap().as_deref(),
            Some(b"cycle 0: pc=0x80000000".as_ref())
        );
    }

    #[test]
    fn test_artifact_naming() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(dir.path()).unwrap();
        assert!(store
            .oracle_path("rv64ui-p-add")
            .ends_with("rv64ui-p-add.oracle"));
        assert!(store
            .candidate_path("rv64ui-p-add")
            .ends_with("rv64ui-p-add.candidate"));
    }

    #[test]
    fn test_candidate_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(dir.path()).unwrap();

        store.store_candidate("t", b"first").unwrap();
        store.store_candidate("t", b"second").unwrap();
        assert_eq!(std::fs::read(store.candidate_path("t")).unwrap(), b"second");
    }

    #[test]
    fn test_clean_removes_only_oracle_traces() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(dir.path()).unwrap();

        store.store_oracle("a", b"x").unwrap();
        store.store_oracle("b", b"y").unwrap();
        store.store_candidate("a", b"z").unwrap();

        assert_eq!(store.clean_oracle().unwrap(), 2);
        assert_eq!(store.load_oracle("a").unwrap(), None);
        assert!(store.candidate_path("a").is_file());
    }

    #[test]
    fn test_deleted_cache_entry_is_a_miss_again() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(dir.path()).unwrap();

        store.store_oracle("t", b"trace").unwrap();
        std::fs::remove_file(store.oracle_path("t")).unwrap();
        assert_eq!(store.load_oracle("t").unwrap(), None);
    }
}
