//! Core module - structured log entries, console sink, per-component logger
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) so the public API only changes on purpose.
//!
//! ## Usage
//! ```ignore
//! use ecosystem_log::core::{LogFields, StructuredLogger};
//! ```

pub mod console;
pub mod entry;
pub mod logger;
pub mod sanitize;

// Explicit re-exports for entry module
pub use entry::{LogEntry, LogFields, Severity};

// Explicit re-exports for console module
pub use console::{
    ConsoleLine, ConsoleSink, MemoryConsole, SharedConsole, TracingConsole, CONSOLE_TARGET,
};

// Explicit re-exports for logger module
pub use logger::StructuredLogger;

// Explicit re-exports for sanitize module
pub use sanitize::{sanitize, SanitizedValue};
