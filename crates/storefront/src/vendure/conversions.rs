//! Conversions from generated GraphQL responses to storefront types.

use vendure_storefront_core::{CurrencyCode, ListingId, OrderId, OrderLineId, Price, ProductListing};

use super::VendureError;
use super::queries::{add_item_to_order, get_products};
use super::types::{AddItemResult, ErrorResult, OrderLine, OrderSummary};

// =============================================================================
// Product Conversions
// =============================================================================

pub fn convert_product_list(data: get_products::ResponseData) -> Vec<ProductListing> {
    data.products.items.into_iter().map(convert_product).collect()
}

/// Convert one catalog item, reading the first asset and the first variant.
pub fn convert_product(product: get_products::GetProductsProductsItems) -> ProductListing {
    let preview_image = product.assets.into_iter().next().map(|asset| asset.preview);

    let price = product.variants.into_iter().next().map(|variant| {
        Price::new(variant.price, convert_currency_code(variant.currency_code))
    });

    ProductListing {
        id: ListingId::new(product.id),
        name: product.name,
        description: product.description,
        preview_image,
        price,
    }
}

/// Codes outside the vendored schema arrive as `Other` and are kept as-is.
fn convert_currency_code(code: get_products::CurrencyCode) -> CurrencyCode {
    match code {
        get_products::CurrencyCode::Other(code) => CurrencyCode::new(&code),
        known => CurrencyCode::new(&format!("{known:?}")),
    }
}

// =============================================================================
// Order Conversions
// =============================================================================

/// Convert the add-item union.
///
/// # Errors
///
/// Returns `VendureError::UnexpectedResult` if an order quantity does not
/// fit a `u32`.
pub fn convert_add_item_result(
    raw: add_item_to_order::AddItemToOrderAddItemToOrder,
) -> Result<AddItemResult, VendureError> {
    use add_item_to_order::AddItemToOrderAddItemToOrder as Union;

    let (typename, error_code, message) = match raw {
        Union::Order(order) => return convert_order(order).map(AddItemResult::Order),
        Union::OrderModificationError(e) => ("OrderModificationError", e.error_code, e.message),
        Union::OrderLimitError(e) => ("OrderLimitError", e.error_code, e.message),
        Union::NegativeQuantityError(e) => ("NegativeQuantityError", e.error_code, e.message),
        Union::InsufficientStockError(e) => ("InsufficientStockError", e.error_code, e.message),
    };

    Ok(AddItemResult::Error(ErrorResult {
        typename: typename.to_string(),
        error_code: match error_code {
            add_item_to_order::ErrorCode::Other(code) => code,
            known => format!("{known:?}"),
        },
        message,
    }))
}

fn convert_order(
    order: add_item_to_order::AddItemToOrderAddItemToOrderOnOrder,
) -> Result<OrderSummary, VendureError> {
    let lines = order
        .lines
        .into_iter()
        .map(|line| {
            Ok(OrderLine {
                id: OrderLineId::new(line.id),
                quantity: convert_quantity(line.quantity)?,
            })
        })
        .collect::<Result<Vec<_>, VendureError>>()?;

    Ok(OrderSummary {
        id: OrderId::new(order.id),
        code: order.code,
        sub_total: order.sub_total,
        total_quantity: convert_quantity(order.total_quantity)?,
        lines,
    })
}

fn convert_quantity(quantity: i64) -> Result<u32, VendureError> {
    u32::try_from(quantity)
        .map_err(|_| VendureError::UnexpectedResult(format!("quantity out of range: {quantity}")))
}
