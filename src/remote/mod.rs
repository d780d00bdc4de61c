//! Remote document store seam
//!
//! The logger and bootstrap only depend on the two traits here. The
//! Firestore REST client, with service-account token exchange, is the
//! production implementation; `MemoryStore` and `MemoryConnector` serve
//! embedding and tests.

mod error;
mod firestore;
mod memory;
mod token;

use std::sync::Arc;

use crate::config::ServiceAccountKey;
use crate::core::LogEntry;

pub use error::RemoteError;
pub use firestore::{FirestoreConnector, FirestoreSettings, FirestoreStore};
pub use memory::{MemoryConnector, MemoryStore};

/// Shared, read-only handle to an initialized remote store
pub type SharedRemoteStore = Arc<dyn RemoteStore>;

/// A connected document store
pub trait RemoteStore: Send + Sync {
    /// Write one document to `collection`. A single attempt, no retry.
    fn write(&self, collection: &str, entry: &LogEntry) -> Result<(), RemoteError>;
}

/// Builds a connected store from a credential bundle
pub trait RemoteConnector: Send + Sync {
    fn connect(&self, key: &ServiceAccountKey) -> Result<SharedRemoteStore, RemoteError>;
}

/// Shared connectors are connectors too, so callers can keep a handle for
/// inspection after giving one to `ConfigBootstrap`
impl<C: RemoteConnector + ?Sized> RemoteConnector for Arc<C> {
    fn connect(&self, key: &ServiceAccountKey) -> Result<SharedRemoteStore, RemoteError> {
        (**self).connect(key)
    }
}
