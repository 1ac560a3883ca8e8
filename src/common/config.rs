//! Configuration file handling
//!
//! Settings come from three layers: built-in defaults, the TOML config file,
//! and CLI flags. CLI flags win, then the file, then the defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Executable and directory paths
    #[serde(default)]
    pub paths: Paths,

    /// Runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Executable and directory paths
#[derive(Debug, Deserialize, Default)]
pub struct Paths {
    /// Reference (oracle) simulator executable
    pub oracle: Option<PathBuf>,

    /// Candidate simulator executable
    pub candidate: Option<PathBuf>,

    /// Root directory of the test-binary corpus
    pub corpus: Option<PathBuf>,

    /// Directory for captured trace artifacts
    pub trace_dir: Option<PathBuf>,
}

/// Runner settings
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Wildcard pattern selecting test names
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Per-test wall-clock timeout in seconds (no timeout if absent)
    pub timeout_secs: Option<u64>,

    /// Number of tests processed in parallel
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            timeout_secs: None,
            jobs: default_jobs(),
        }
    }
}

fn default_pattern() -> String {
    "rv64*-p-*".to_string()
}

fn default_jobs() -> usize {
    1
}

/// Default trace directory, relative to the working directory
pub fn default_trace_dir() -> PathBuf {
    PathBuf::from("trace_dir")
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Load from an explicit path if given, otherwise the default location
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }
}

/// Settings for one harness run, after merging config and CLI flags
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub oracle: PathBuf,
    pub candidate: PathBuf,
    pub corpus: PathBuf,
    pub trace_dir: PathBuf,
    pub pattern: String,
    pub timeout: Option<Duration>,
    pub jobs: usize,
}

/// Resolve an executable path, searching PATH for bare names
///
/// An explicit path (containing a separator) is used as-is; a bare name is
/// looked up with `which`.
pub fn resolve_executable(exe: &Path) -> Result<PathBuf> {
    if exe.components().count() > 1 {
        return Ok(exe.to_path_buf());
    }
    which::which(exe).map_err(|_| Error::ExecutableNotFound(exe.display().to_string()))
}
