//! Bearer tokens for the Firestore REST API
//!
//! A service account signs an RS256 assertion with its private key and
//! trades it at `token_uri` for a short-lived access token (OAuth 2.0 JWT
//! bearer grant). The token is cached and refreshed shortly before expiry.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::RemoteError;
use crate::config::ServiceAccountKey;

/// OAuth scope for Firestore document access
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime in seconds (1 hour is the endpoint maximum)
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Refresh a cached token this many seconds before it expires
const REFRESH_BUFFER_SECS: u64 = 120;

/// Where a store gets its bearer token from
pub enum TokenSource {
    /// Emulator token or an explicit `FIRESTORE_ACCESS_TOKEN`
    Static(String),
    ServiceAccount(ServiceAccountTokens),
}

impl TokenSource {
    pub fn bearer(&self) -> Result<String, RemoteError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(tokens) => tokens.access_token(),
        }
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    /// Unix seconds
    expires_at: u64,
}

/// Access tokens minted from a service-account key
pub struct ServiceAccountTokens {
    client_email: String,
    private_key_id: String,
    token_uri: String,
    signing_key: EncodingKey,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    /// # Errors
    /// `RemoteError::MalformedCredential` when the private key is not an RSA PEM key
    pub fn new(key: &ServiceAccountKey, http: Client) -> Result<Self, RemoteError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            RemoteError::MalformedCredential(format!("private key is not a usable RSA key: {}", e))
        })?;

        Ok(Self {
            client_email: key.client_email.clone(),
            private_key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            signing_key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Current access token, exchanging a fresh assertion when the cached
    /// one is missing or about to expire
    pub fn access_token(&self) -> Result<String, RemoteError> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = unix_now();
        if let Some(token) = cached.as_ref() {
            if now + REFRESH_BUFFER_SECS < token.expires_at {
                return Ok(token.value.clone());
            }
            debug!(client_email = %self.client_email, "Access token near expiry, refreshing");
        }

        let fresh = self.exchange(now)?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    fn sign_assertion(&self, now: u64) -> Result<String, RemoteError> {
        let mut header = Header::new(Algorithm::RS256);
        if !self.private_key_id.is_empty() {
            header.kid = Some(self.private_key_id.clone());
        }

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.signing_key).map_err(|e| {
            RemoteError::MalformedCredential(format!("failed to sign token assertion: {}", e))
        })
    }

    fn exchange(&self, now: u64) -> Result<CachedToken, RemoteError> {
        let assertion = self.sign_assertion(now)?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| RemoteError::Network(format!("token exchange failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "<no body>".to_string());
            return Err(RemoteError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| RemoteError::Auth(format!("unreadable token response: {}", e)))?;
        if token.access_token.is_empty() {
            return Err(RemoteError::Auth(
                "token response has no access_token".to_string(),
            ));
        }

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!(
            client_email = %self.client_email,
            expires_in = lifetime,
            "Remote store access token obtained"
        );

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + lifetime,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
