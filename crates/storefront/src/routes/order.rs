//! Order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::middleware::OrderContext;

/// Header subtotal fragment template (for htmx).
#[derive(Template, WebTemplate)]
#[template(path = "partials/header_subtotal.html")]
pub struct HeaderSubtotalTemplate {
    pub sub_total: String,
}

/// Format a subtotal for the header, without trailing zeros.
#[must_use]
pub fn format_sub_total(sub_total: Decimal) -> String {
    sub_total.normalize().to_string()
}

/// Current order subtotal (htmx, refreshed on `order-updated`).
#[instrument(skip(context))]
pub async fn subtotal(context: OrderContext) -> HeaderSubtotalTemplate {
    HeaderSubtotalTemplate {
        sub_total: format_sub_total(context.order.sub_total()),
    }
}
