//! Firestore REST client for the remote log store
//!
//! Documents are created with a single POST per entry:
//! `{base}/v1/projects/{project}/databases/(default)/documents/{collection}`
//!
//! Authentication is a bearer token: the emulator's fixed token when
//! `FIRESTORE_EMULATOR_HOST` is set, else `FIRESTORE_ACCESS_TOKEN` when
//! given, else an access token minted from the service-account key.
//!
//! Clients live in a process-wide registry keyed by endpoint and service
//! account, so every connector in the process shares one client per project.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::token::{ServiceAccountTokens, TokenSource};
use super::{RemoteConnector, RemoteError, RemoteStore, SharedRemoteStore};
use crate::config::constants::{
    remote_write_timeout, DEFAULT_FIRESTORE_BASE_URL, EMULATOR_ACCESS_TOKEN,
    FIRESTORE_ACCESS_TOKEN, FIRESTORE_BASE_URL, FIRESTORE_EMULATOR_HOST,
};
use crate::config::{EnvSource, ServiceAccountKey};
use crate::core::LogEntry;

/// Transport settings for the Firestore client
#[derive(Clone)]
pub struct FirestoreSettings {
    /// Scheme and host, no trailing slash
    pub base_url: String,
    /// Overrides service-account token minting when set
    pub access_token: Option<String>,
    /// Bounded timeout applied to every request
    pub timeout: Duration,
}

impl FirestoreSettings {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let timeout = remote_write_timeout(env);
        let non_empty = |key: &str| {
            env.lookup(key)
                .ok()
                .flatten()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(host) = non_empty(FIRESTORE_EMULATOR_HOST) {
            return Self {
                base_url: format!("http://{}", host.trim_end_matches('/')),
                access_token: Some(EMULATOR_ACCESS_TOKEN.to_string()),
                timeout,
            };
        }

        Self {
            base_url: env
                .var_or(FIRESTORE_BASE_URL, DEFAULT_FIRESTORE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            access_token: non_empty(FIRESTORE_ACCESS_TOKEN),
            timeout,
        }
    }
}

impl std::fmt::Debug for FirestoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreSettings")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Connector
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    base_url: String,
    project_id: String,
    client_email: String,
    token_uri: String,
}

impl SessionKey {
    fn new(settings: &FirestoreSettings, key: &ServiceAccountKey) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            project_id: key.project_id.clone(),
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
        }
    }
}

/// Clients already built in this process
fn sessions() -> &'static Mutex<HashMap<SessionKey, SharedRemoteStore>> {
    static SESSIONS: OnceLock<Mutex<HashMap<SessionKey, SharedRemoteStore>>> = OnceLock::new();
    SESSIONS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Builds Firestore clients, at most one per project and service account in
/// the whole process
///
/// A `connect` for a project that already has a client returns that client,
/// whichever connector built it.
#[derive(Debug)]
pub struct FirestoreConnector {
    settings: FirestoreSettings,
}

impl FirestoreConnector {
    pub fn new(settings: FirestoreSettings) -> Self {
        Self { settings }
    }

    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self::new(FirestoreSettings::from_env(env))
    }

    pub fn settings(&self) -> &FirestoreSettings {
        &self.settings
    }
}

impl RemoteConnector for FirestoreConnector {
    fn connect(&self, key: &ServiceAccountKey) -> Result<SharedRemoteStore, RemoteError> {
        let session_key = SessionKey::new(&self.settings, key);
        let mut sessions = sessions()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = sessions.get(&session_key) {
            debug!(project_id = %key.project_id, "Reusing existing remote store client");
            return Ok(Arc::clone(existing));
        }

        let store: SharedRemoteStore = Arc::new(FirestoreStore::new(&self.settings, key)?);
        sessions.insert(session_key, Arc::clone(&store));

        info!(
            project_id = %key.project_id,
            client_email = %key.client_email,
            base_url = %self.settings.base_url,
            "Remote log store client initialized"
        );
        Ok(store)
    }
}

// ============================================================================
// Store
// ============================================================================

/// A connected Firestore project
pub struct FirestoreStore {
    documents_url: String,
    http: Client,
    tokens: TokenSource,
    timeout: Duration,
}

impl FirestoreStore {
    /// Build the client and make sure it can authenticate.
    ///
    /// Without a configured access token the service-account key is
    /// exchanged for one right away, so bad credentials fail here rather
    /// than on the first write.
    ///
    /// # Errors
    /// - `RemoteError::MalformedCredential` when the token cannot be sent as a header
    ///   or the private key cannot sign
    /// - `RemoteError::Auth` when the token endpoint refuses the service account
    /// - `RemoteError::Network` when the HTTP client cannot be built or the
    ///   token endpoint is unreachable
    pub fn new(settings: &FirestoreSettings, key: &ServiceAccountKey) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to build HTTP client: {}", e)))?;

        let tokens = match settings.access_token.as_deref() {
            Some(token) => {
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    RemoteError::MalformedCredential(
                        "access token is not a valid header value".to_string(),
                    )
                })?;
                TokenSource::Static(token.to_string())
            }
            None => {
                let tokens = ServiceAccountTokens::new(key, http.clone())?;
                tokens.access_token()?;
                TokenSource::ServiceAccount(tokens)
            }
        };

        Ok(Self {
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                settings.base_url, key.project_id
            ),
            http,
            tokens,
            timeout: settings.timeout,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Network(format!(
                "request timed out after {}ms",
                self.timeout.as_millis()
            ))
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}

impl RemoteStore for FirestoreStore {
    fn write(&self, collection: &str, entry: &LogEntry) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.documents_url, collection);
        let document = to_firestore_document(entry)?;
        let token = self.tokens.bearer()?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[("documentId", Uuid::new_v4().to_string())])
            .json(&document)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RemoteError::Auth(format!(
                "{} writing to {}",
                status, collection
            ))),
            status => {
                let body = response.text().unwrap_or_else(|_| "<no body>".to_string());
                Err(RemoteError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

/// Encode an entry as a Firestore document: `{"fields": {name: typed value}}`
pub(crate) fn to_firestore_document(entry: &LogEntry) -> Result<Value, RemoteError> {
    let Value::Object(flat) = serde_json::to_value(entry)? else {
        return Err(RemoteError::Serialization(
            "log entry did not serialize to an object".to_string(),
        ));
    };

    let fields: Map<String, Value> = flat
        .into_iter()
        .map(|(name, value)| {
            let typed = match value {
                Value::Null => json!({ "nullValue": null }),
                Value::String(s) => json!({ "stringValue": s }),
                other => json!({ "stringValue": other.to_string() }),
            };
            (name, typed)
        })
        .collect();

    Ok(json!({ "fields": fields }))
}

// ============================================================================
// Tests
// ============================================================================
