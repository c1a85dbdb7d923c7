//! The project log sink: one log file plus standard output.
//!
//! # Sink lifecycle
//!
//! The sink never installs itself with
//! `tracing::subscriber::set_global_default`, which can only succeed once per
//! process.  It is an explicit value passed to whoever logs:
//!
//! ```text
//! init(&LogConfig) ──► LogSink ──► FileUtils::new(sink)
//!                        │
//!                        ├─ in_scope(|| …)    route records for one call
//!                        ├─ set_default()     route records for a thread
//!                        └─ flush() / shutdown()
//! ```
//!
//! Internally a `LogSink` wraps a [`tracing::Dispatch`] whose subscriber has
//! two `fmt` layers (file and stdout) sharing [`BracketFormat`].
//!
//! # Idempotent initialisation
//!
//! [`init`] keeps the active sink in a process-wide slot.  Calling it again
//! with the same config hands back the same sink, so there is still exactly
//! one file output and one stdout output.  Calling it with a different config
//! flushes and retires the previous sink first.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::dispatcher::{self, DefaultGuard};
use tracing::{debug, info, Dispatch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, UtilsError};
use crate::logging::config::LogConfig;
use crate::logging::format::BracketFormat;

/// Name under which the sink announces itself.
pub const LOGGER_NAME: &str = "mlProjectLogger";

/// First record written by every freshly opened sink.
pub const SETUP_MESSAGE: &str = "Logging setup successful!";

static ACTIVE: Mutex<Option<LogSink>> = Mutex::new(None);

struct SinkInner {
    dispatch: Dispatch,
    file: Arc<File>,
    path: PathBuf,
    config: LogConfig,
}

/// Handle to an open log sink.  Cloning is cheap; clones share the same
/// file handle and outputs.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<SinkInner>,
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("path", &self.inner.path)
            .field("outputs", &self.output_count())
            .finish()
    }
}

impl LogSink {
    /// Opens a standalone sink, outside the process-wide slot used by [`init`].
    ///
    /// Creates the log directory (and parents) and opens the log file in
    /// append mode.  Does not write the setup message.
    ///
    /// # Errors
    ///
    /// [`UtilsError::LogInit`] if the directory or file cannot be opened, or
    /// [`UtilsError::TypeMismatch`] for an unknown level name.
    pub fn open(config: &LogConfig) -> Result<Self> {
        let level = config.level_filter()?;

        std::fs::create_dir_all(&config.log_dir).map_err(|source| UtilsError::LogInit {
            path: config.log_dir.clone(),
            source,
        })?;

        let path = config.log_file();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| UtilsError::LogInit {
                path: path.clone(),
                source,
            })?;
        let file = Arc::new(file);

        let filter = if config.respect_env {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()))
        } else {
            EnvFilter::default().add_directive(level.into())
        };

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(BracketFormat::new())
            .with_writer(Arc::clone(&file));

        let stdout_layer = config.stdout.then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(BracketFormat::new())
                .with_writer(std::io::stdout)
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stdout_layer);

        Ok(Self {
            inner: Arc::new(SinkInner {
                dispatch: Dispatch::new(subscriber),
                file,
                path,
                config: config.clone(),
            }),
        })
    }

    /// Runs `f` with this sink as the current thread's subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.inner.dispatch, f)
    }

    /// Routes the current thread's records into this sink until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.inner.dispatch)
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn config(&self) -> &LogConfig {
        &self.inner.config
    }

    pub fn name(&self) -> &'static str {
        LOGGER_NAME
    }

    /// Number of outputs records are written to: the file, plus stdout when enabled.
    pub fn output_count(&self) -> usize {
        1 + usize::from(self.inner.config.stdout)
    }

    /// `true` when both handles refer to the same underlying sink.
    pub fn same_sink(&self, other: &LogSink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Flushes both outputs and syncs the log file to disk.
    ///
    /// # Errors
    ///
    /// Returns [`UtilsError::Io`] if either output cannot be flushed.
    pub fn flush(&self) -> Result<()> {
        (&*self.inner.file)
            .flush()
            .and_then(|()| self.inner.file.sync_data())
            .map_err(|e| UtilsError::io(&self.inner.path, e))?;
        if self.inner.config.stdout {
            std::io::stdout()
                .flush()
                .map_err(|e| UtilsError::io("<stdout>", e))?;
        }
        Ok(())
    }

    /// Flushes the sink and, if it is the process's active sink, retires it so
    /// the next [`init`] opens a fresh one.
    ///
    /// Other clones keep working; the file closes when the last clone drops.
    ///
    /// # Errors
    ///
    /// Propagates [`LogSink::flush`] failures.
    pub fn shutdown(self) -> Result<()> {
        let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
        if active.as_ref().is_some_and(|current| current.same_sink(&self)) {
            *active = None;
        }
        drop(active);
        self.flush()
    }
}

/// Initialises the process log sink and announces it.
///
/// Idempotent: a repeated call with an equal `config` returns the sink that
/// is already active without opening a second file handle or repeating the
/// setup message.
///
/// # Errors
///
/// Fails with [`UtilsError::LogInit`] when the log directory cannot be
/// created; there is no fallback sink.
pub fn init(config: &LogConfig) -> Result<LogSink> {
    let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(current) = active.as_ref() {
        if current.config() == config {
            return Ok(current.clone());
        }
    }

    if let Some(previous) = active.take() {
        previous.in_scope(|| debug!("replacing log sink at {}", previous.path().display()));
        previous.flush()?;
    }

    let sink = LogSink::open(config)?;
    sink.in_scope(|| info!(target: LOGGER_NAME, "{SETUP_MESSAGE}"));
    *active = Some(sink.clone());
    Ok(sink)
}

/// The sink installed by the last successful [`init`], if any.
pub fn active() -> Option<LogSink> {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// These tests only use `LogSink::open`; `init` mutates process-wide state and
// is exercised from `tests/logging_init.rs`, which runs in its own process.
