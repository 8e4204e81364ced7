//! A typed value mirrored into a [`DurableStore`].
//!
//! `PersistedValue` keeps one value in memory and writes it through to the
//! store on every update. The write point is explicit: [`PersistedValue::set`]
//! first replaces the in-memory value, then serializes and stores it. There
//! is no deduplication, so setting an equal value still writes.
//!
//! Two cells created with the same key do not observe each other's
//! in-memory updates. Only a freshly loaded cell sees what another cell
//! persisted.
//!
//! # Example
//!
//! ```rust
//! # use vendure_storefront_core::{MemoryStore, PersistedValue};
//! # async fn example() -> Result<(), vendure_storefront_core::StoreError> {
//! let store = MemoryStore::new();
//!
//! let mut visits = PersistedValue::load(store.clone(), "visits", 0_u32).await;
//! visits.set(*visits.get() + 1).await?;
//!
//! let reloaded = PersistedValue::load(store, "visits", 0_u32).await;
//! assert_eq!(*reloaded.get(), 1);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::store::{DurableStore, StoreError};

/// A single typed value persisted under a stable key.
#[derive(Debug, Clone)]
pub struct PersistedValue<T, S> {
    key: String,
    value: T,
    store: S,
}

impl<T, S> PersistedValue<T, S>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    S: DurableStore,
{
    /// Load the value stored under `key`, falling back to `initial`.
    ///
    /// A missing entry, an unreadable store, or an entry that does not parse
    /// as `T` all yield `initial` unmodified. None of these are surfaced to
    /// the caller. The resulting value is persisted immediately, so a fresh
    /// key always has an entry after loading.
    pub async fn load(store: S, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();

        let value = match store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!(key = %key, error = %e, "Stored value did not parse, using default");
                    initial
                }
            },
            Ok(None) => initial,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read durable store, using default");
                initial
            }
        };

        let cell = Self { key, value, store };
        if let Err(e) = cell.persist().await {
            warn!(key = %cell.key, error = %e, "Failed to persist initial value");
        }
        cell
    }

    /// The store key this cell mirrors.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current in-memory value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and write it to the store.
    ///
    /// The in-memory value is updated even when the store write fails.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the store write fails.
    pub async fn set(&mut self, value: T) -> Result<(), StoreError> {
        self.write(value);
        self.persist().await
    }

    /// Delete the store entry. The in-memory value is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store write fails.
    pub async fn remove(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await
    }

    fn write(&mut self, value: T) {
        self.value = value;
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.value)?;
        self.store.set(&self.key, raw).await
    }
}
