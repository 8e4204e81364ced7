//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (header + catalog placeholder)
//! GET  /health                 - Health check
//!
//! # Catalog (htmx fragments)
//! GET  /products               - Catalog fragment (error or product grid)
//! POST /products/{id}/buy      - Add to order (toast fragment, triggers order-updated)
//!
//! # Order (htmx fragments)
//! GET  /order/subtotal         - Header subtotal
//! ```

pub mod home;
pub mod order;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}/buy", post(products::buy))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/subtotal", get(order::subtotal))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/order", order_routes())
}
