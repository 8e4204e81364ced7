//! Vendure Shop API client.
//!
//! # Architecture
//!
//! - `graphql_client` generates request/response types, `reqwest` does HTTP
//! - The Shop API is the source of truth; nothing is synced locally
//! - The catalog is cached in memory via `moka` (TTL from config)
//! - Add-item calls are never cached
//!
//! Handlers depend on [`ShopApi`] through [`crate::services`], so the
//! purchase flow can be exercised against a fake API.
//!
//! # Sessions
//!
//! Vendure tracks the active order per Shop API session. The session token
//! is returned in the `vendure-auth-token` response header and sent back as
//! a bearer token on later calls.

mod client;
mod conversions;
pub mod queries;
pub mod types;

use std::future::Future;

use thiserror::Error;
use vendure_storefront_core::ProductListing;

pub use client::VendureClient;
pub use types::*;

/// Response header carrying the Shop API session token.
pub const AUTH_TOKEN_HEADER: &str = "vendure-auth-token";

/// Request header selecting the channel.
pub const CHANNEL_TOKEN_HEADER: &str = "vendure-token";

/// Errors that can occur when talking to the Shop API.
#[derive(Debug, Error)]
pub enum VendureError {
    /// The request could not be sent or the body could not be read.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The Shop API answered with a non-success status.
    #[error("Shop API returned {status}")]
    Status { status: u16, body: String },

    /// The GraphQL response carried top-level errors.
    #[error("{}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// The response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the Shop API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The add-item result could not be represented, e.g. a negative quantity.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}

/// A GraphQL error returned by the Shop API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the failing field, e.g. `products.items`.
    pub path: Vec<String>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| match (e.message.is_empty(), e.path.is_empty()) {
            (false, true) => e.message.clone(),
            (false, false) => format!("{} (path: {})", e.message, e.path.join(".")),
            (true, false) => format!("path: {}", e.path.join(".")),
            (true, true) => format!("[error {}]: (no details)", i + 1),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Operations the storefront needs from the Shop API.
pub trait ShopApi: Send + Sync {
    /// Fetch the catalog in Shop API order.
    ///
    /// # Errors
    ///
    /// Returns `VendureError` on transport, status, GraphQL or parse failures.
    fn products(&self) -> impl Future<Output = Result<Vec<ProductListing>, VendureError>> + Send;

    /// Add a variant to the active order of the session in `request`.
    ///
    /// A structured rejection is `Ok` with [`AddItemResult::Error`].
    ///
    /// # Errors
    ///
    /// Returns `VendureError` on transport, status, GraphQL or parse failures
    /// and on unknown result types.
    fn add_item_to_order(
        &self,
        request: AddItemRequest,
    ) -> impl Future<Output = Result<AddItemResponse, VendureError>> + Send;
}
