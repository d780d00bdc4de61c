//! Shared configuration and structured logging for the trading ecosystem
//!
//! - `config`: one-time resolution of operating mode, exchange, log level and
//!   remote-store credentials into a read-only `ProcessConfig`
//! - `core`: per-component `StructuredLogger` writing to the console and
//!   best-effort mirroring structured entries to the remote store
//! - `remote`: the remote document store seam and its Firestore client

pub mod config;
pub mod core;
pub mod error;
pub mod remote;

pub use error::AppError;
