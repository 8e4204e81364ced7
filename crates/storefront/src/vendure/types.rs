//! Shop API types used by the storefront.
//!
//! These are converted from the raw GraphQL response shapes in
//! [`super::queries`] and carry only what the storefront reads.

use rust_decimal::Decimal;
use vendure_storefront_core::{ListingId, OrderDetails, OrderId, OrderLineId};

/// Input for one add-item call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    pub product_variant_id: ListingId,
    pub quantity: u32,
    /// Session token from a previous Shop API response, if any.
    pub auth_token: Option<String>,
}

/// Outcome of one add-item call plus the session token it issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemResponse {
    pub result: AddItemResult,
    /// Value of the `vendure-auth-token` response header.
    pub auth_token: Option<String>,
}

/// Result of the add-item mutation.
///
/// The Shop API answers with either the updated order or one of the
/// `ErrorResult` members of the union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemResult {
    Order(OrderSummary),
    Error(ErrorResult),
}

/// The active order after an item was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: OrderId,
    pub code: String,
    pub sub_total: Decimal,
    pub total_quantity: u32,
    pub lines: Vec<OrderLine>,
}

impl OrderSummary {
    /// The subtotal/quantity pair kept in order state.
    #[must_use]
    pub const fn details(&self) -> OrderDetails {
        OrderDetails::new(self.sub_total, self.total_quantity)
    }
}

/// One line of the active order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub quantity: u32,
}

/// A structured error returned in place of the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResult {
    /// GraphQL type name, e.g. `InsufficientStockError`.
    pub typename: String,
    /// Machine-readable code, e.g. `INSUFFICIENT_STOCK_ERROR`.
    pub error_code: String,
    pub message: String,
}
