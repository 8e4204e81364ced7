//! Vendure Storefront Core - order state and catalog types.
//!
//! This crate provides the pieces of the storefront that do not depend on
//! HTTP or templates:
//! - `storefront` - Public-facing web front end (uses everything here)
//! - `integration-tests` - End-to-end tests against a fake Shop API
//!
//! # Architecture
//!
//! The core crate has no HTTP clients and no web framework. State is written
//! through the [`DurableStore`] trait, so the same order logic runs over an
//! in-memory map in tests and over the visitor's session in the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and prices
//! - [`store`] - Durable key/value store trait and in-memory implementation
//! - [`persisted`] - A typed value mirrored into a store
//! - [`order`] - Subtotal and quantity of the running order
//! - [`listing`] - Product listings and the display predicate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod order;
pub mod persisted;
pub mod store;
pub mod types;

pub use listing::{ProductListing, displayable_listings};
pub use order::{OrderDetails, OrderScopeError, OrderState};
pub use persisted::PersistedValue;
pub use store::{DurableStore, MemoryStore, StoreError};
pub use types::*;
