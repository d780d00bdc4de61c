//! In-memory remote store
//!
//! Records every written entry and counts calls, with optional failure
//! injection. Used by tests and by embedders that want entries in-process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{RemoteConnector, RemoteError, RemoteStore, SharedRemoteStore};
use crate::config::ServiceAccountKey;
use crate::core::LogEntry;

type WriteHook = Box<dyn Fn(&LogEntry) + Send + Sync>;

/// Store keeping entries in a vector
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<(String, LogEntry)>>,
    write_calls: AtomicUsize,
    fail_with: Option<RemoteError>,
    on_write: Option<WriteHook>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails with `err`
    pub fn failing(err: RemoteError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    /// Run `hook` at the start of every write, before success or failure
    pub fn on_write(mut self, hook: impl Fn(&LogEntry) + Send + Sync + 'static) -> Self {
        self.on_write = Some(Box::new(hook));
        self
    }

    /// Number of `write` invocations, failed ones included
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Entries successfully written, in order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Entries successfully written to `collection`, in order
    pub fn entries_in(&self, collection: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, LogEntry)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RemoteStore for MemoryStore {
    fn write(&self, collection: &str, entry: &LogEntry) -> Result<(), RemoteError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.on_write {
            hook(entry);
        }
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.lock().push((collection.to_string(), entry.clone()));
        Ok(())
    }
}

/// Connector handing out one shared `MemoryStore`
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
    connects: AtomicUsize,
    fail_with: Option<RemoteError>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            connects: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    /// A connector whose every `connect` fails with `err`
    pub fn failing(err: RemoteError) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            connects: AtomicUsize::new(0),
            fail_with: Some(err),
        }
    }

    /// Number of `connect` invocations, failed ones included
    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

impl RemoteConnector for MemoryConnector {
    fn connect(&self, _key: &ServiceAccountKey) -> Result<SharedRemoteStore, RemoteError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.store.clone() as SharedRemoteStore),
        }
    }
}
