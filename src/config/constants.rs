//! Environment variable names and configuration defaults
//!
//! Centralizes every key this crate reads so call sites never spell raw
//! strings. Values are looked up through an `EnvSource`.

use std::time::Duration;

use super::env::EnvSource;

// =============================================================================
// Process Settings
// =============================================================================

/// Operating mode: `paper`, `live` or `backtest`
pub const TRADING_MODE: &str = "TRADING_MODE";
pub const DEFAULT_TRADING_MODE: &str = "paper";

pub const EXCHANGE_NAME: &str = "EXCHANGE_NAME";
pub const DEFAULT_EXCHANGE_NAME: &str = "binance";

pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Console format: `plain` (default), `pretty` or `json`
pub const LOG_FORMAT: &str = "LOG_FORMAT";

// =============================================================================
// Remote Store Credentials
// =============================================================================

pub const FIREBASE_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const FIREBASE_PRIVATE_KEY_ID: &str = "FIREBASE_PRIVATE_KEY_ID";
/// Private key in PEM form; literal `\n` sequences are accepted
pub const FIREBASE_PRIVATE_KEY: &str = "FIREBASE_PRIVATE_KEY";
pub const FIREBASE_CLIENT_EMAIL: &str = "FIREBASE_CLIENT_EMAIL";
pub const FIREBASE_TOKEN_URI: &str = "FIREBASE_TOKEN_URI";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

// =============================================================================
// Remote Store Transport
// =============================================================================

pub const FIRESTORE_BASE_URL: &str = "FIRESTORE_BASE_URL";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// `host:port` of a local Firestore emulator; takes precedence over the base URL
pub const FIRESTORE_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";

/// Bearer token the emulator accepts for any project
pub const EMULATOR_ACCESS_TOKEN: &str = "owner";

pub const FIRESTORE_ACCESS_TOKEN: &str = "FIRESTORE_ACCESS_TOKEN";

pub const REMOTE_WRITE_TIMEOUT_MS: &str = "REMOTE_WRITE_TIMEOUT_MS";
pub const DEFAULT_REMOTE_WRITE_TIMEOUT_MS: u64 = 2000;

/// Collection every structured log entry is written to
pub const LOG_COLLECTION: &str = "ecosystem_logs";

/// Bounded timeout for a single remote write (default: 2000ms)
///
/// Environment variable: `REMOTE_WRITE_TIMEOUT_MS`
pub fn remote_write_timeout(env: &dyn EnvSource) -> Duration {
    let ms = env
        .lookup(REMOTE_WRITE_TIMEOUT_MS)
        .ok()
        .flatten()
        .and_then(|s| s.trim().parse().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_REMOTE_WRITE_TIMEOUT_MS);
    Duration::from_millis(ms)
}
