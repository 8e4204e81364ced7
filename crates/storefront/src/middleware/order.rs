//! Order scope extractor.
//!
//! The order scope is the visitor's session. Any handler that reads or
//! updates the running order takes an [`OrderContext`]; the extractor loads
//! the order state and the Shop API token from the session and fails with
//! [`OrderScopeError::Missing`] when the session layer is not installed.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use vendure_storefront_core::{OrderScopeError, OrderState, PersistedValue};

use super::session::SessionStore;
use crate::error::AppError;

/// Session keys owned by the storefront (order keys live in the core crate).
pub mod session_keys {
    /// Shop API session token.
    pub const VENDURE_AUTH_TOKEN: &str = "vendureAuthToken";
}

/// Order state and Shop API session for the current visitor.
pub struct OrderContext {
    pub order: OrderState<SessionStore>,
    pub auth_token: PersistedValue<Option<String>, SessionStore>,
}

impl<S> FromRequestParts<S> for OrderContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(OrderScopeError::Missing)?;

        let store = SessionStore::new(session);
        let order = OrderState::load(store.clone()).await;
        let auth_token = PersistedValue::load(store, session_keys::VENDURE_AUTH_TOKEN, None).await;

        Ok(Self { order, auth_token })
    }
}
