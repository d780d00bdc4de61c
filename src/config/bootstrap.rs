//! One-time process configuration bootstrap
//!
//! `ConfigBootstrap::bootstrap` resolves the environment and attempts remote
//! client construction at most once per bootstrap instance, even when called
//! concurrently. Every failure path degrades to local mode; nothing here
//! returns an error to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! let bootstrap = ConfigBootstrap::from_process_env();
//! let config = bootstrap.bootstrap();
//! let logger = StructuredLogger::create(&config, "scanner", None);
//! ```

use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};

use super::constants::{
    DEFAULT_EXCHANGE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_TRADING_MODE, EXCHANGE_NAME, LOG_LEVEL,
    TRADING_MODE,
};
use super::credentials::{resolve_credentials, Credentials, ServiceAccountKey};
use super::env::{EnvSource, ProcessEnv};
use super::types::{OperatingMode, ProcessConfig};
use crate::remote::{FirestoreConnector, RemoteConnector, RemoteError, SharedRemoteStore};

/// Owns the environment, the connector, and the once-only result
pub struct ConfigBootstrap {
    env: Box<dyn EnvSource>,
    connector: Box<dyn RemoteConnector>,
    config: OnceLock<Arc<ProcessConfig>>,
}

impl ConfigBootstrap {
    pub fn new(env: impl EnvSource + 'static, connector: impl RemoteConnector + 'static) -> Self {
        Self {
            env: Box::new(env),
            connector: Box::new(connector),
            config: OnceLock::new(),
        }
    }

    /// Real process environment and the Firestore connector
    pub fn from_process_env() -> Self {
        Self::from_env_source(ProcessEnv)
    }

    /// Firestore connector configured from the same `env`
    pub fn from_env_source(env: impl EnvSource + 'static) -> Self {
        let connector = FirestoreConnector::from_env(&env);
        Self::new(env, connector)
    }

    /// The process configuration, built on first call.
    ///
    /// Later and concurrent calls return the same `Arc` without touching the
    /// environment or the connector again.
    pub fn bootstrap(&self) -> Arc<ProcessConfig> {
        Arc::clone(
            self.config
                .get_or_init(|| Arc::new(build_process_config(&*self.env, &*self.connector))),
        )
    }

    /// True once `bootstrap` has completed
    pub fn is_initialized(&self) -> bool {
        self.config.get().is_some()
    }
}

/// Resolve every setting and attempt remote client construction once.
///
/// Prefer `ConfigBootstrap::bootstrap`, which guards this against repeated
/// and concurrent invocation.
pub fn build_process_config(env: &dyn EnvSource, connector: &dyn RemoteConnector) -> ProcessConfig {
    let mode = OperatingMode::resolve(Some(
        env.var_or(TRADING_MODE, DEFAULT_TRADING_MODE).as_str(),
    ));
    let exchange_name = env.var_or(EXCHANGE_NAME, DEFAULT_EXCHANGE_NAME);
    let log_level = env.var_or(LOG_LEVEL, DEFAULT_LOG_LEVEL);
    let credentials = resolve_credentials(env);

    let remote_client = match &credentials {
        Some(creds) if !creds.project_id.trim().is_empty() => init_remote_client(creds, connector),
        _ => {
            warn!("Remote store credentials not found. Running in local mode.");
            None
        }
    };

    info!(
        mode = %mode,
        exchange = %exchange_name,
        log_level = %log_level,
        remote = remote_client.is_some(),
        "Process configuration resolved"
    );

    ProcessConfig::new(mode, exchange_name, log_level, credentials, remote_client)
}

fn init_remote_client(
    credentials: &Credentials,
    connector: &dyn RemoteConnector,
) -> Option<SharedRemoteStore> {
    let result = ServiceAccountKey::from_credentials(credentials)
        .and_then(|key| connector.connect(&key));

    match result {
        Ok(client) => {
            info!(project_id = %credentials.project_id, "Remote log store initialized");
            Some(client)
        }
        Err(e @ RemoteError::MalformedCredential(_)) => {
            error!(error = %e, "Remote store credentials are malformed. Running in local mode.");
            None
        }
        Err(e @ RemoteError::Auth(_)) => {
            error!(error = %e, "Remote store authentication failed. Running in local mode.");
            None
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Failed to initialize remote store. Running in local mode.");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
