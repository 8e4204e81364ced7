//! Durable key/value store abstraction.
//!
//! A store maps string keys to JSON text. It is shared by every
//! [`PersistedValue`](crate::persisted::PersistedValue) created over it and
//! is the only channel through which two cells with the same key can see
//! each other's writes.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors raised by a durable store or by value (de)serialization.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The value could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store rejected the operation.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A durable string key/value store.
///
/// Implementations only need to move opaque JSON text; typing lives in
/// `PersistedValue`.
pub trait DurableStore: Send + Sync {
    /// Read the raw entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store cannot be read.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Write the raw entry for `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store cannot be written.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete the entry for `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store cannot be written.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-process store backed by a shared `HashMap`.
///
/// Clones share the same map, so a `MemoryStore` behaves like a single
/// browser-session store handed to several consumers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an entry without going through the async API.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Seed an entry without going through the async API.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value.into());
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
