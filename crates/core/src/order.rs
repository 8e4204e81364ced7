//! Running order state persisted across page loads.
//!
//! `OrderState` composes two [`PersistedValue`] cells, the subtotal and the
//! total quantity, and only exposes a combined update. Both values come
//! from one Shop API response, so they are always written together by
//! [`OrderState::set_order_details`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persisted::PersistedValue;
use crate::store::{DurableStore, StoreError};

/// Store keys used by the order state.
pub mod keys {
    /// Key for the order subtotal.
    pub const SUB_TOTAL: &str = "subTotal";

    /// Key for the total item quantity.
    pub const TOTAL_QUANTITY: &str = "totalQuantity";
}

/// Raised when order state is requested outside an order scope.
///
/// This is a wiring defect (the scope was never installed), not a runtime
/// condition, and callers must not recover from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderScopeError {
    #[error("order state must be used within an order scope")]
    Missing,
}

/// The pair of values written by one successful add-to-order response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub sub_total: Decimal,
    pub total_quantity: u32,
}

impl OrderDetails {
    /// Create order details.
    #[must_use]
    pub const fn new(sub_total: Decimal, total_quantity: u32) -> Self {
        Self {
            sub_total,
            total_quantity,
        }
    }
}

/// Subtotal and quantity of the visitor's running order.
#[derive(Debug, Clone)]
pub struct OrderState<S> {
    sub_total: PersistedValue<Decimal, S>,
    total_quantity: PersistedValue<u32, S>,
}

impl<S> OrderState<S>
where
    S: DurableStore + Clone,
{
    /// Load both cells from `store`, defaulting to an empty order.
    pub async fn load(store: S) -> Self {
        let sub_total = PersistedValue::load(store.clone(), keys::SUB_TOTAL, Decimal::ZERO).await;
        let total_quantity = PersistedValue::load(store, keys::TOTAL_QUANTITY, 0_u32).await;

        Self {
            sub_total,
            total_quantity,
        }
    }

    /// Current subtotal.
    #[must_use]
    pub fn sub_total(&self) -> Decimal {
        *self.sub_total.get()
    }

    /// Current total quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        *self.total_quantity.get()
    }

    /// Both values as one snapshot.
    #[must_use]
    pub fn details(&self) -> OrderDetails {
        OrderDetails::new(self.sub_total(), self.total_quantity())
    }

    /// Replace subtotal and quantity together.
    ///
    /// Both in-memory values are updated and both writes are attempted even
    /// if the first one fails. The two writes are not transactional: a store
    /// reader between them could see the new subtotal with the old quantity.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    pub async fn set_order_details(&mut self, details: OrderDetails) -> Result<(), StoreError> {
        let sub_total = self.sub_total.set(details.sub_total).await;
        let total_quantity = self.total_quantity.set(details.total_quantity).await;
        sub_total.and(total_quantity)
    }
}
