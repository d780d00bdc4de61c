//! Structured log entries written to the remote store

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Log level tag carried by every entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional structured fields a call site may attach
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFields {
    pub strategy_id: Option<String>,
    pub trade_id: Option<String>,
}

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy_id: impl Into<String>) -> Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }

    pub fn trade(mut self, trade_id: impl Into<String>) -> Self {
        self.trade_id = Some(trade_id.into());
        self
    }
}

/// One structured record for the remote store.
///
/// Absent optional fields serialize as `null`, never as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// ISO-8601 UTC, assigned when the entry is built
    pub timestamp: String,
    pub level: Severity,
    pub component: String,
    pub message: String,
    pub agent_id: Option<String>,
    pub strategy_id: Option<String>,
    pub trade_id: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    /// Build an entry stamped with the current UTC time
    pub fn new(
        level: Severity,
        component: &str,
        message: &str,
        agent_id: Option<&str>,
        fields: &LogFields,
        error_details: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level,
            component: component.to_string(),
            message: message.to_string(),
            agent_id: present(agent_id),
            strategy_id: present(fields.strategy_id.as_deref()),
            trade_id: present(fields.trade_id.as_deref()),
            error_details,
        }
    }

    /// Document shape as JSON, with explicit nulls
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
