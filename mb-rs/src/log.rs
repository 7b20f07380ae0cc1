//! Logging hook.
//!
//! The parser never decides verbosity itself; it reports events to a
//! [`LogSink`] supplied by the caller.  Three sinks ship with the crate:
//!
//! | Sink | Behaviour |
//! |------|-----------|
//! | [`TracingSink`] | forwards to the `tracing` macros (default) |
//! | [`ConsoleSink`] | writes prefixed, coloured lines to stderr |
//! | [`NullSink`]    | discards everything |

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Once;

use crossterm::style::Stylize;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set.  Safe to call more than once.
/// `RUST_LOG=mb=trace` shows every registration and unresolved reference.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

// ── Severity ──────────────────────────────────────────────────────────────────

/// Severity of a log event, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Registration detail.
    Debug   = 0,
    /// Individual steps of a larger operation.
    Steps   = 1,
    Info    = 2,
    Warning = 3,
    Error   = 4,
}

impl Severity {
    pub const ALL: &'static [Severity] = &[
        Severity::Debug,
        Severity::Steps,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Severity::Debug   => "debug",
            Severity::Steps   => "steps",
            Severity::Info    => "info",
            Severity::Warning => "warning",
            Severity::Error   => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Accepts the numeric level (`"0"`..`"4"`) or the name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, String> {
        if let Ok(n) = s.parse::<u8>() {
            return Severity::ALL
                .get(usize::from(n))
                .copied()
                .ok_or_else(|| format!("invalid log level {n}"));
        }
        let lower = s.to_ascii_lowercase();
        Severity::ALL
            .iter()
            .copied()
            .find(|sev| sev.name() == lower || (lower == "warn" && *sev == Severity::Warning))
            .ok_or_else(|| format!("invalid log level {:?}", s))
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Receiver for log events.
pub trait LogSink {
    fn emit(&self, severity: Severity, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

/// Forwards events to `tracing` under the `mb` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug   => tracing::trace!(target: "mb", "{message}"),
            Severity::Steps   => tracing::debug!(target: "mb", "{message}"),
            Severity::Info    => tracing::info!(target: "mb", "{message}"),
            Severity::Warning => tracing::warn!(target: "mb", "{message}"),
            Severity::Error   => tracing::error!(target: "mb", "{message}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, _: Severity, _: &str) {}
}

/// Writes events at or above `threshold` to stderr.
///
/// Each line is prefixed by a marker for its severity:
/// `---` debug, blank steps, `==>` info, `WRN` warning, `ERR` error.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    pub threshold: Severity,
    /// Emit ANSI styling.  Disable when stderr is not a terminal.
    pub color: bool,
}

impl ConsoleSink {
    pub fn new(threshold: Severity) -> Self {
        Self { threshold, color: true }
    }

    /// Format one event; `None` if it falls below the threshold.
    pub fn format(&self, severity: Severity, message: &str) -> Option<String> {
        if severity < self.threshold {
            return None;
        }
        let prefix = match severity {
            Severity::Debug   => "---",
            Severity::Steps   => "   ",
            Severity::Info    => "==>",
            Severity::Warning => "WRN",
            Severity::Error   => "ERR",
        };
        if !self.color {
            return Some(format!("{prefix} {message}"));
        }
        let prefix = match severity {
            Severity::Info    => prefix.bold().green().to_string(),
            Severity::Warning => prefix.bold().yellow().to_string(),
            Severity::Error   => prefix.bold().red().to_string(),
            _ => prefix.to_owned(),
        };
        Some(format!("{prefix} {}", message.bold()))
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(Severity::Steps)
    }
}

impl LogSink for ConsoleSink {
    fn emit(&self, severity: Severity, message: &str) {
        if let Some(line) = self.format(severity, message) {
            let _ = writeln!(io::stderr().lock(), "{line}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
