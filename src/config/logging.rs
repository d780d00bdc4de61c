//! Console logging initialization
//!
//! Installs the global `tracing` subscriber that renders console lines for
//! `TracingConsole` and for this crate's own diagnostics.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `INFO` | TRACE, DEBUG, INFO, WARNING, ERROR or CRITICAL |
//! | `RUST_LOG` | unset | Full filter directive, overrides `LOG_LEVEL` |
//! | `LOG_FORMAT` | `plain` | `plain`, `pretty` or `json` |
//!
//! `plain` prints `<timestamp> - <component> - <LEVEL> - <message>` to stdout.
//!
//! The level filter applies to this crate's own diagnostics. `StructuredLogger`
//! lines (target `CONSOLE_TARGET`) always pass at INFO and above.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as ts_fmt, prelude::*, EnvFilter};

use super::constants::{DEFAULT_LOG_LEVEL, LOG_FORMAT, LOG_LEVEL};
use super::env::{EnvSource, ProcessEnv};
use crate::core::CONSOLE_TARGET;

/// Flag to track if logging has been initialized (prevents double-init)
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Concurrent `ensure_console` callers wait for the first one to finish
static CONSOLE_CHECKED: Once = Once::new();

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleFormat {
    #[default]
    Plain,
    Pretty,
    Json,
}

impl ConsoleFormat {
    /// Unknown values fall back to `Plain`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => ConsoleFormat::Pretty,
            "json" => ConsoleFormat::Json,
            _ => ConsoleFormat::Plain,
        }
    }
}

/// Configuration for the console subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub filter: String,
    pub format: ConsoleFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: level_directive(DEFAULT_LOG_LEVEL).to_string(),
            format: ConsoleFormat::Plain,
        }
    }
}

impl LoggingConfig {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let filter = match env.lookup("RUST_LOG").ok().flatten() {
            Some(directive) if !directive.trim().is_empty() => directive,
            _ => level_directive(&env.var_or(LOG_LEVEL, DEFAULT_LOG_LEVEL)).to_string(),
        };

        Self {
            filter,
            format: ConsoleFormat::parse(&env.var_or(LOG_FORMAT, "plain")),
        }
    }
}

/// Map a `LOG_LEVEL` name to a filter directive; unknown names map to `info`
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Install the global subscriber.
///
/// Subsequent calls are no-ops. If another subscriber was installed
/// elsewhere, that one stays and a note goes to stderr.
pub fn init_logging(config: &LoggingConfig) {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let filter = console_filter(config);

    let result = match config.format {
        ConsoleFormat::Plain => tracing_subscriber::registry()
            .with(
                ts_fmt::layer()
                    .event_format(ComponentFormat)
                    .with_writer(std::io::stdout),
            )
            .with(filter)
            .try_init(),
        ConsoleFormat::Pretty => tracing_subscriber::registry()
            .with(ts_fmt::layer().pretty().with_target(true))
            .with(filter)
            .try_init(),
        ConsoleFormat::Json => tracing_subscriber::registry()
            .with(ts_fmt::layer().json().with_target(true))
            .with(filter)
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Console logging not installed: {}", e);
    }
}

/// Install the subscriber from the process environment unless some global
/// subscriber is already in place
pub fn ensure_console() {
    CONSOLE_CHECKED.call_once(|| {
        if !tracing::dispatcher::has_been_set() {
            init_logging(&LoggingConfig::from_env(&ProcessEnv));
        }
    });
}

/// `config.filter` plus a directive keeping logger lines at INFO
fn console_filter(config: &LoggingConfig) -> EnvFilter {
    let with_console = |base: &str| {
        if base.contains(CONSOLE_TARGET) {
            base.to_string()
        } else {
            format!("{},{}=info", base, CONSOLE_TARGET)
        }
    };

    EnvFilter::try_new(with_console(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(with_console(level_directive(DEFAULT_LOG_LEVEL))))
}

// ============================================================================
// Plain Line Format
// ============================================================================

/// `<timestamp> - <component> - <LEVEL> - <message>`
///
/// Component is the event's `component` field, else its target. Level is the
/// `severity` field, else the event level. Other fields are appended as
/// `[key=value, ...]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentFormat;

impl<S, N> FormatEvent<S, N> for ComponentFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let component = visitor.component.as_deref().unwrap_or_else(|| meta.target());
        let level = visitor
            .severity
            .unwrap_or_else(|| level_name(meta.level()).to_string());

        write!(
            writer,
            "{} - {} - {} - {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            component,
            level,
            visitor.message
        )?;
        if !visitor.extra.is_empty() {
            write!(writer, " [{}]", visitor.extra.join(", "))?;
        }
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    component: Option<String>,
    severity: Option<String>,
    extra: Vec<String>,
}

impl LineVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            "component" => self.component = Some(value),
            "severity" => self.severity = Some(value),
            "agent_id" => {}
            name => self.extra.push(format!("{}={}", name, value)),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

// ============================================================================
// Tests
// ============================================================================
