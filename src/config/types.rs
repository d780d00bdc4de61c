//! Configuration types shared across the process
//!
//! `ProcessConfig` is built once by `ConfigBootstrap` and handed out as
//! `Arc<ProcessConfig>`; nothing mutates it afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::credentials::Credentials;
use crate::remote::SharedRemoteStore;

// ============================================================================
// Enums
// ============================================================================

/// Execution context the trading system runs in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Paper,
    Live,
    Backtest,
}

impl OperatingMode {
    /// Resolve a raw `TRADING_MODE` value.
    ///
    /// Unset or empty input yields `Paper`. Anything unrecognized is logged as
    /// a configuration warning and also yields `Paper`.
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match raw.parse() {
            Ok(mode) => mode,
            Err(_) => {
                warn!(
                    value = raw,
                    "Unrecognized TRADING_MODE (expected paper|live|backtest), defaulting to paper"
                );
                Self::default()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Paper => "paper",
            OperatingMode::Live => "live",
            OperatingMode::Backtest => "backtest",
        }
    }
}

impl FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paper" => Ok(OperatingMode::Paper),
            "live" => Ok(OperatingMode::Live),
            "backtest" => Ok(OperatingMode::Backtest),
            other => Err(format!("unknown operating mode '{}'", other)),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Process Configuration
// ============================================================================

/// The single configuration object for the process
#[derive(Clone)]
pub struct ProcessConfig {
    pub mode: OperatingMode,
    pub exchange_name: String,
    pub log_level: String,
    pub credentials: Option<Credentials>,
    /// Present only if credentials were present and client construction succeeded
    remote_client: Option<SharedRemoteStore>,
}

impl ProcessConfig {
    pub fn new(
        mode: OperatingMode,
        exchange_name: String,
        log_level: String,
        credentials: Option<Credentials>,
        remote_client: Option<SharedRemoteStore>,
    ) -> Self {
        // A client cannot exist without the credentials it was built from
        let remote_client = if credentials.is_some() { remote_client } else { None };
        Self {
            mode,
            exchange_name,
            log_level,
            credentials,
            remote_client,
        }
    }

    /// Configuration with no remote store
    pub fn local(mode: OperatingMode, exchange_name: &str, log_level: &str) -> Self {
        Self::new(mode, exchange_name.to_string(), log_level.to_string(), None, None)
    }

    /// Shared handle to the remote store, if one was initialized
    pub fn remote_client(&self) -> Option<SharedRemoteStore> {
        self.remote_client.clone()
    }

    /// True when no remote store is available
    pub fn is_local_mode(&self) -> bool {
        self.remote_client.is_none()
    }
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("mode", &self.mode)
            .field("exchange_name", &self.exchange_name)
            .field("log_level", &self.log_level)
            .field("credentials", &self.credentials)
            .field("remote_client", &self.remote_client.is_some())
            .finish()
    }
}
