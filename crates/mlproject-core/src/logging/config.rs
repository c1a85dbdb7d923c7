//! Settings for the project log sink.
//!
//! The defaults reproduce the scaffold's fixed layout: records go to
//! `logs/running_logs.log` and to standard output at `info` level.  A project
//! may override them with a small TOML file:
//!
//! ```toml
//! log_dir = "logs"
//! file_name = "running_logs.log"
//! level = "info"
//! stdout = true
//! respect_env = false
//! ```
//!
//! Every field has a `#[serde(default = "...")]` so a partial file, or no
//! file at all, still yields a complete config.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::error::{Result, UtilsError};

/// Log sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory holding the log file; created on demand.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// File name inside `log_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Minimum severity: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"` or `"off"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Mirror every record to standard output.
    #[serde(default = "default_true")]
    pub stdout: bool,
    /// Let `RUST_LOG` override `level` when it is set.
    #[serde(default)]
    pub respect_env: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
fn default_file_name() -> String {
    "running_logs.log".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_name: default_file_name(),
            level: default_level(),
            stdout: default_true(),
            respect_env: false,
        }
    }
}

impl LogConfig {
    /// Default settings with the log directory moved to `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the log file.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }

    /// Parses `level` into a filter.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::TypeMismatch`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level).map_err(|_| UtilsError::TypeMismatch {
            param: "level".to_string(),
            expected: "one of error, warn, info, debug, trace, off",
            found: format!("{:?}", self.level),
        })
    }

    /// Loads settings from a TOML file, returning [`LogConfig::default`] if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::Io`] for file-system errors other than "not found",
    /// and [`UtilsError::LogConfig`] if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| UtilsError::LogConfig {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(UtilsError::io(path, e)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
