//! Remote log store smoke test
//!
//! Writes one entry straight to the remote store and fails loudly if the
//! store is not configured or the write is refused. Unlike the logger, this
//! binary surfaces every remote error.
//!
//! Usage:
//!   FIREBASE_PROJECT_ID=xxx FIREBASE_PRIVATE_KEY_ID=... FIREBASE_PRIVATE_KEY=... \
//!   FIREBASE_CLIENT_EMAIL=... cargo run --bin remote_log_smoke
//!
//! Against the emulator:
//!   FIRESTORE_EMULATOR_HOST=localhost:8080 cargo run --bin remote_log_smoke

use ecosystem_log::config::constants::LOG_COLLECTION;
use ecosystem_log::config::logging::{init_logging, LoggingConfig};
use ecosystem_log::config::{resolve_credentials, ProcessEnv, ServiceAccountKey};
use ecosystem_log::core::{LogEntry, LogFields, Severity};
use ecosystem_log::remote::{FirestoreConnector, RemoteConnector};
use ecosystem_log::AppError;
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env(&ProcessEnv));

    let credentials = resolve_credentials(&ProcessEnv)
        .filter(|c| !c.project_id.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Remote store not configured - set FIREBASE_PROJECT_ID and friends"))?;
    info!(project_id = %credentials.project_id, "Credentials loaded");

    let key = ServiceAccountKey::from_credentials(&credentials).map_err(AppError::from)?;
    let connector = FirestoreConnector::from_env(&ProcessEnv);
    let store = connector.connect(&key).map_err(AppError::from)?;

    let entry = LogEntry::new(
        Severity::Info,
        "remote_log_smoke",
        "Remote log store smoke test",
        None,
        &LogFields::new().strategy("smoke"),
        None,
    );
    store.write(LOG_COLLECTION, &entry).map_err(AppError::from)?;

    info!(collection = LOG_COLLECTION, timestamp = %entry.timestamp, "Smoke entry written");
    Ok(())
}
