//! Logging initializer: builds the project log sink.
//!
//! - `config` – [`LogConfig`]: directory, file name, level, stdout mirroring.
//! - `format` – [`BracketFormat`]: `[<timestamp>: <LEVEL>: <module>: <message>]`.
//! - `sink`   – [`LogSink`] and the idempotent [`init`].

pub mod config;
pub mod format;
pub mod sink;

pub use config::LogConfig;
pub use format::BracketFormat;
pub use sink::{active, init, LogSink, LOGGER_NAME, SETUP_MESSAGE};
