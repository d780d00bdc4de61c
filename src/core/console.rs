//! Console sink for human-readable log lines
//!
//! `TracingConsole` forwards to `tracing`; formatting and the output stream
//! are decided by the subscriber installed in `config::logging`.
//! `MemoryConsole` keeps lines in memory for tests and embedders.

use std::sync::{Arc, Mutex};

use super::entry::Severity;

/// Target of every `TracingConsole` event. The installed filter always
/// passes it at INFO, whatever `LOG_LEVEL` says.
pub const CONSOLE_TARGET: &str = "ecosystem_log::console";

/// Shared console handle
pub type SharedConsole = Arc<dyn ConsoleSink>;

/// Synchronous, infallible line output
pub trait ConsoleSink: Send + Sync {
    fn emit(&self, severity: Severity, component: &str, agent_id: Option<&str>, message: &str);
}

/// Console sink backed by `tracing` events.
///
/// Every event carries `component` and `severity` fields so the plain
/// formatter can print `CRITICAL`, which `tracing` has no level for.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn emit(&self, severity: Severity, component: &str, agent_id: Option<&str>, message: &str) {
        let tag = severity.as_str();
        match severity {
            Severity::Info => {
                tracing::info!(
                    target: CONSOLE_TARGET,
                    component,
                    agent_id,
                    severity = tag,
                    "{}",
                    message
                )
            }
            Severity::Warning => {
                tracing::warn!(
                    target: CONSOLE_TARGET,
                    component,
                    agent_id,
                    severity = tag,
                    "{}",
                    message
                )
            }
            Severity::Error | Severity::Critical => {
                tracing::error!(
                    target: CONSOLE_TARGET,
                    component,
                    agent_id,
                    severity = tag,
                    "{}",
                    message
                )
            }
        }
    }
}

/// A line captured by `MemoryConsole`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub severity: Severity,
    pub component: String,
    pub agent_id: Option<String>,
    pub message: String,
}

/// Console sink that records lines in order
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ConsoleLine>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConsoleSink for MemoryConsole {
    fn emit(&self, severity: Severity, component: &str, agent_id: Option<&str>, message: &str) {
        self.lock().push(ConsoleLine {
            severity,
            component: component.to_string(),
            agent_id: agent_id.map(str::to_string),
            message: message.to_string(),
        });
    }
}
