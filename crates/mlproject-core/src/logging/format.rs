//! The fixed record template shared by the file and stdout outputs:
//!
//! ```text
//! [2024-05-01T09:30:12.123456Z: INFO: common: Json file saved at: artifacts/metrics.json]
//! ```
//!
//! `module` is the last segment of the emitting module's path, so records
//! from `mlproject_core::utils::common` show up as `common`.  `LEVEL` uses
//! the conventional names `DEBUG`, `INFO`, `WARNING` and `ERROR`.

use std::fmt;

use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `[<timestamp>: <LEVEL>: <module>: <message>]`
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketFormat {
    timer: SystemTime,
}

impl BracketFormat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for BracketFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(writer, "[")?;
        self.timer.format_time(&mut writer)?;
        write!(writer, ": {}: {}: ", level_name(meta.level()), module_name(meta))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer, "]")
    }
}

pub(crate) fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// Last `::` segment of the module path, falling back to the target.
pub(crate) fn module_name<'a>(meta: &Metadata<'a>) -> &'a str {
    let path = meta.module_path().unwrap_or_else(|| meta.target());
    path.rsplit("::").next().unwrap_or(path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
