//! Per-component structured logger
//!
//! Every call writes one console line first, then (if a remote store is
//! bound) makes a single attempt to write a `LogEntry` to the
//! `ecosystem_logs` collection. A failed remote write produces one
//! console-only note and the call returns normally.
//!
//! # Example
//!
//! ```rust,ignore
//! let logger = StructuredLogger::create(&config, "order_manager", Some("agent-3"));
//! logger.info("Order placed", LogFields::new().strategy("grid").trade("T-1"));
//! logger.error("Order rejected", Some(&err), LogFields::new().trade("T-2"));
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

use super::console::{SharedConsole, TracingConsole};
use super::entry::{LogEntry, LogFields, Severity};
use crate::config::constants::LOG_COLLECTION;
use crate::config::logging::ensure_console;
use crate::config::ProcessConfig;
use crate::remote::{RemoteError, SharedRemoteStore};

/// Logging handle bound to one component and, optionally, one agent
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
    agent_id: Option<String>,
    console: SharedConsole,
    remote: Option<SharedRemoteStore>,
}

impl StructuredLogger {
    /// Logger using the tracing console and the remote store already
    /// initialized in `config`. Never initializes a client itself.
    ///
    /// Installs the console subscriber if nothing has installed one yet, so
    /// console lines are never silently dropped.
    pub fn create(config: &ProcessConfig, component: &str, agent_id: Option<&str>) -> Self {
        ensure_console();
        Self::with_sinks(
            component,
            agent_id,
            Arc::new(TracingConsole),
            config.remote_client(),
        )
    }

    /// Logger with explicit sinks
    pub fn with_sinks(
        component: &str,
        agent_id: Option<&str>,
        console: SharedConsole,
        remote: Option<SharedRemoteStore>,
    ) -> Self {
        Self {
            component: component.to_string(),
            agent_id: agent_id.filter(|a| !a.is_empty()).map(str::to_string),
            console,
            remote,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn info(&self, message: &str, fields: LogFields) {
        self.log(Severity::Info, message, message, fields, None);
    }

    pub fn warning(&self, message: &str, fields: LogFields) {
        self.log(Severity::Warning, message, message, fields, None);
    }

    /// Log an error, optionally with the failure that caused it.
    ///
    /// The failure's `Display` text becomes `error_details`; without one the
    /// field stays absent.
    pub fn error(&self, message: &str, error: Option<&dyn StdError>, fields: LogFields) {
        let error_details = error.map(|e| e.to_string());
        let console_line = match &error_details {
            Some(details) => format!("{}: {}", message, details),
            None => message.to_string(),
        };
        self.log(Severity::Error, &console_line, message, fields, error_details);
    }

    pub fn critical(&self, message: &str, fields: LogFields) {
        self.log(Severity::Critical, message, message, fields, None);
    }

    fn log(
        &self,
        severity: Severity,
        console_line: &str,
        message: &str,
        fields: LogFields,
        error_details: Option<String>,
    ) {
        self.console
            .emit(severity, &self.component, self.agent_id.as_deref(), console_line);

        let Some(remote) = &self.remote else {
            return;
        };

        let entry = LogEntry::new(
            severity,
            &self.component,
            message,
            self.agent_id.as_deref(),
            &fields,
            error_details,
        );

        if let Err(e) = remote.write(LOG_COLLECTION, &entry) {
            self.report_remote_failure(&e);
        }
    }

    /// Console-only; never routed back to the remote store
    fn report_remote_failure(&self, err: &RemoteError) {
        let note = match err {
            RemoteError::Auth(_) => format!("Remote log store refused credentials: {}", err),
            _ => format!("Failed to log to remote store ({}): {}", err.kind(), err),
        };
        self.console
            .emit(Severity::Error, &self.component, self.agent_id.as_deref(), &note);
    }
}

impl std::fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("component", &self.component)
            .field("agent_id", &self.agent_id)
            .field("remote", &self.remote.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
