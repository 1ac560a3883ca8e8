//! Error types for the harness
//!
//! Per-test errors (launch failures, cache-write failures) are recoverable
//! and never abort a batch; only corpus-level discovery errors are fatal.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Discovery Errors ===
    #[error("Corpus directory '{0}' not found")]
    CorpusNotFound(PathBuf),

    #[error("Failed to read corpus directory '{path}': {source}")]
    CorpusUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Execution Errors ===
    #[error("Failed to launch '{exe}': {source}")]
    Launch {
        exe: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Lost output stream of '{0}'")]
    OutputCapture(PathBuf),

    // === Trace Store Errors ===
    #[error("Failed to write trace artifact '{path}': {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read cached trace '{path}': {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Executable '{0}' not found in PATH")]
    ExecutableNotFound(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a launch error for an executable that could not be spawned
    pub fn launch(exe: &Path, source: io::Error) -> Self {
        Self::Launch {
            exe: exe.to_path_buf(),
            source,
        }
    }

    /// Create a cache-write error for a trace artifact path
    pub fn cache_write(path: &Path, source: io::Error) -> Self {
        Self::CacheWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a cache-read error for a trace artifact path
    pub fn cache_read(path: &Path, source: io::Error) -> Self {
        Self::CacheRead {
            path: path.to_path_buf(),
            source,
        }
    }
}
