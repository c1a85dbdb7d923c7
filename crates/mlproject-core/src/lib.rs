//! # mlproject-core
//!
//! Shared utilities for the mlProject pipeline: the log sink every stage
//! writes to, and the small set of file helpers stages use to read their
//! configuration and persist their outputs.
//!
//! # Architecture overview (for beginners)
//!
//! A training pipeline is a chain of stages (data ingestion, validation,
//! transformation, training, evaluation).  Every stage needs the same
//! plumbing: read `config.yaml`, create its artifact directories, save
//! metrics as JSON, pickle a model to disk, and log what it did.  This crate
//! is that plumbing.
//!
//! - **`logging`** – builds a [`LogSink`] that writes
//!   `[<timestamp>: <LEVEL>: <module>: <message>]` lines to
//!   `logs/running_logs.log` and to stdout.  The sink is an explicit value
//!   handed to whoever logs; [`logging::init`] is safe to call repeatedly.
//!
//! - **`domain`** – [`ConfigBox`], the order-preserving mapping returned by
//!   YAML and JSON reads, with key-style and dotted attribute-style access.
//!
//! - **`utils`** – [`FileUtils`]: `read_yaml`, `create_directories`,
//!   `save_json`, `load_json`, `save_bin`, `load_bin`, `get_size`.
//!
//! ```rust,no_run
//! use mlproject_core::{logging, FileUtils, LogConfig};
//!
//! let files = FileUtils::new(logging::init(&LogConfig::default())?);
//! let params = files.read_yaml("params.yaml")?;
//! let alpha = params.get_f64("ElasticNet.alpha")?;
//! files.save_json("artifacts/metrics.json", &serde_json::json!({ "alpha": alpha }))?;
//! # Ok::<(), mlproject_core::UtilsError>(())
//! ```

pub mod domain;
pub mod error;
pub mod logging;
pub mod utils;

// Re-export the most-used types at the crate root so callers can write
// `mlproject_core::FileUtils` instead of `mlproject_core::utils::common::FileUtils`.
pub use domain::ConfigBox;
pub use error::{Result, UtilsError};
pub use logging::{LogConfig, LogSink};
pub use utils::FileUtils;
