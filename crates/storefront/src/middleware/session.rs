//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions backed by a `moka` cache.
//! The session is the visitor's durable store: order state and the Shop API
//! token live here and survive page reloads for as long as the cookie does.
//!
//! Every first visit creates a session, because order state persists its
//! defaults on load. The cache is bounded and drops each record once its
//! inactivity expiry passes, so anonymous traffic cannot grow it forever.

use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;
use vendure_storefront_core::{DurableStore, StoreError};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vs_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Maximum number of sessions kept in memory.
pub const SESSION_STORE_CAPACITY: u64 = 100_000;

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store(SESSION_STORE_CAPACITY))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Session records evicted beyond `capacity` and expired at their
/// `expiry_date`.
#[must_use]
pub fn session_store(capacity: u64) -> MokaStore {
    MokaStore::new(Some(capacity))
}

/// [`DurableStore`] over the visitor's session.
///
/// Entries are stored as JSON text under their key, exactly as
/// `PersistedValue` hands them over.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl DurableStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.session
            .remove_value(key)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::SessionStore as _;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};
    use vendure_storefront_core::PersistedValue;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(session_store(16)), None)
    }

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_session() {
        let store = SessionStore::new(session());

        store.set("subTotal", "\"100\"".to_string()).await.unwrap();
        assert_eq!(store.get("subTotal").await.unwrap().as_deref(), Some("\"100\""));

        store.remove("subTotal").await.unwrap();
        assert_eq!(store.get("subTotal").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persisted_value_over_session() {
        let session = session();

        let mut token = PersistedValue::load(SessionStore::new(session.clone()), "vendureAuthToken", None::<String>).await;
        token.set(Some("abc".to_string())).await.unwrap();

        let reloaded = PersistedValue::load(SessionStore::new(session), "vendureAuthToken", None::<String>).await;
        assert_eq!(reloaded.get().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_non_string_entry_falls_back() {
        let session = session();
        session.insert("totalQuantity", 5_u32).await.unwrap();

        // Not JSON text, so the store read fails and the default is used.
        let cell = PersistedValue::load(SessionStore::new(session), "totalQuantity", 0_u32).await;
        assert_eq!(*cell.get(), 0);
    }

    #[tokio::test]
    async fn test_store_stays_bounded_under_anonymous_traffic() {
        let store = session_store(8);

        let mut ids = Vec::new();
        for _ in 0..1_000 {
            let record = record(Duration::seconds(SESSION_EXPIRY_SECONDS));
            store.save(&record).await.unwrap();
            ids.push(record.id);
        }

        let mut live = 0;
        for id in &ids {
            if store.load(id).await.unwrap().is_some() {
                live += 1;
            }
        }
        // Eviction runs in batches, so a few records beyond capacity may
        // still be visible; the bulk must be gone.
        assert!(live < 200, "{live} of {} sessions still stored", ids.len());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_loaded() {
        let store = session_store(8);
        let record = record(Duration::minutes(-1));

        store.save(&record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_live_session_is_loaded() {
        let store = session_store(8);
        let record = record(Duration::hours(1));

        store.save(&record).await.unwrap();
        assert_eq!(store.load(&record.id).await.unwrap().map(|r| r.id), Some(record.id));
    }
}
