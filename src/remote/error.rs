//! Remote store error types

use thiserror::Error;

/// Failure kinds for remote store construction and writes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport failure, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials were refused or no access token is available
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Credential bundle cannot be used to build a client
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// The store answered with an unexpected status
    #[error("Remote store rejected write ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RemoteError {
    /// Short kind label for console notes
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::Network(_) => "network",
            RemoteError::Auth(_) => "auth",
            RemoteError::MalformedCredential(_) => "malformed-credential",
            RemoteError::Rejected { .. } => "rejected",
            RemoteError::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Serialization(e.to_string())
    }
}
