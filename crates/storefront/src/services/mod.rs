//! Business logic services for storefront.
//!
//! # Services
//!
//! - `purchase` - The buy flow (add-item call, order update, notification)
//! - `notifications` - Toast messages collected per request

pub mod notifications;
pub mod purchase;

pub use notifications::Notifications;
pub use purchase::{PURCHASE_QUANTITY, PURCHASE_THANKS, PurchaseOutcome, buy_listing};
