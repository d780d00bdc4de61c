//! Configuration module for process-wide settings
//!
//! This module provides:
//! - Environment lookup seam (`EnvSource`, `ProcessEnv`, `EnvMap`)
//! - Configuration types (`OperatingMode`, `ProcessConfig`)
//! - Remote store credentials (`Credentials`, `ServiceAccountKey`)
//! - One-time bootstrap (`ConfigBootstrap`)
//! - Console logging initialization (`logging`)
//! - Named environment variables and defaults (`constants`)

mod bootstrap;
pub mod constants;
mod credentials;
mod env;
pub mod logging;
mod types;

pub use bootstrap::{build_process_config, ConfigBootstrap};
pub use credentials::{normalize_private_key, resolve_credentials, Credentials, ServiceAccountKey};
pub use env::{ConfigError, EnvMap, EnvSource, ProcessEnv};
pub use types::{OperatingMode, ProcessConfig};
