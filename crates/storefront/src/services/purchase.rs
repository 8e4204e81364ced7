//! The buy flow: one add-item call feeding order state and notifications.

use tracing::{error, info, instrument, warn};
use vendure_storefront_core::{DurableStore, ListingId, OrderDetails, OrderState, PersistedValue};

use crate::services::Notifications;
use crate::vendure::{AddItemRequest, AddItemResult, ErrorResult, ShopApi};

/// Quantity added by one click on "Buy".
pub const PURCHASE_QUANTITY: u32 = 1;

/// Notification shown after a successful add-item.
pub const PURCHASE_THANKS: &str = "Thanks for your purchase!";

/// What happened to one buy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The item was added and order state now holds these details.
    Added(OrderDetails),
    /// The Shop API refused the item with a structured error.
    Rejected(ErrorResult),
    /// The call failed in transport or protocol; the message is for logs.
    Failed(String),
}

/// Add one unit of `listing_id` to the visitor's order.
///
/// Issues exactly one add-item call. On success the order state is
/// replaced with the returned subtotal and quantity and exactly one
/// notification is queued. A structured rejection is logged at `warn` and
/// a transport failure at `error`; neither touches order state or
/// notifications.
///
/// A session token issued by the Shop API is persisted whatever the
/// result, so the next call continues the same server-side order.
#[instrument(skip_all, fields(listing_id = %listing_id))]
pub async fn buy_listing<A, S>(
    api: &A,
    order: &mut OrderState<S>,
    auth_token: &mut PersistedValue<Option<String>, S>,
    notifications: &mut Notifications,
    listing_id: &ListingId,
) -> PurchaseOutcome
where
    A: ShopApi,
    S: DurableStore + Clone,
{
    let request = AddItemRequest {
        product_variant_id: listing_id.clone(),
        quantity: PURCHASE_QUANTITY,
        auth_token: auth_token.get().clone(),
    };

    let response = match api.add_item_to_order(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Failed to add item to order");
            return PurchaseOutcome::Failed(e.to_string());
        }
    };

    if let Some(token) = response.auth_token
        && auth_token.get().as_deref() != Some(token.as_str())
        && let Err(e) = auth_token.set(Some(token)).await
    {
        warn!(error = %e, "Failed to persist Shop API session token");
    }

    match response.result {
        AddItemResult::Order(summary) => {
            let details = summary.details();
            if let Err(e) = order.set_order_details(details).await {
                warn!(error = %e, "Failed to persist order details");
            }
            notifications.notify(PURCHASE_THANKS);
            info!(
                order_id = %summary.id,
                sub_total = %details.sub_total,
                total_quantity = details.total_quantity,
                "Item added to order"
            );
            PurchaseOutcome::Added(details)
        }
        AddItemResult::Error(rejection) => {
            warn!(
                error_code = %rejection.error_code,
                message = %rejection.message,
                "Shop API rejected add to order"
            );
            PurchaseOutcome::Rejected(rejection)
        }
    }
}
