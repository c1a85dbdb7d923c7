//! Error type shared by every utility in this crate.
//!
//! # Error taxonomy
//!
//! | Variant            | Raised when                                                    |
//! |--------------------|----------------------------------------------------------------|
//! | `TypeMismatch`     | an argument has the wrong shape; raised before any I/O         |
//! | `ValueConversion`  | parsed content cannot become a [`crate::ConfigBox`]            |
//! | `MissingKey`       | a typed getter asked for a key the mapping does not hold       |
//! | `Io` / `Yaml` / …  | the underlying file system or format library failed            |
//! | `LogInit`          | the log sink could not open its directory or file              |
//!
//! Every variant that touches the file system carries the offending path so
//! the message alone is enough to locate the problem.

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::binary::ArtifactError;

/// Errors returned by the logging initializer and the file utilities.
#[derive(Debug, Error)]
pub enum UtilsError {
    /// An argument does not match its declared semantic type.
    #[error("type mismatch for `{param}`: expected {expected}, found {found}")]
    TypeMismatch {
        param: String,
        expected: &'static str,
        found: String,
    },

    /// Parsed content could not be coerced into a configuration mapping.
    #[error("value conversion failed: {0}")]
    ValueConversion(String),

    /// A typed getter was asked for a key that is not present.
    #[error("missing key: '{0}'")]
    MissingKey(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML document could not be parsed.
    #[error("failed to parse YAML at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The JSON document could not be parsed or serialized.
    #[error("JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The binary artifact could not be encoded or decoded.
    #[error("binary serialization error at {path}: {source}")]
    Binary {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    /// The file is not a binary artifact this version can read.
    #[error("unrecognised binary artifact at {path}: {reason}")]
    BinaryFormat { path: PathBuf, reason: String },

    /// The log directory or log file could not be opened.
    #[error("failed to initialise log sink at {path}: {source}")]
    LogInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The logging configuration file could not be parsed.
    #[error("failed to parse logging config {path}: {source}")]
    LogConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl UtilsError {
    /// Wraps an [`std::io::Error`] with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for failures raised by boundary validation, before any I/O.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UtilsError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
