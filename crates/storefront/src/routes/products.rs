//! Catalog route handlers.
//!
//! The home page renders the catalog in its loading phase; htmx then
//! fetches `GET /products`, which answers with the failed or ready phase.
//! "Buy" posts to `POST /products/{id}/buy` and gets toasts back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use tracing::instrument;
use vendure_storefront_core::{ListingId, ProductListing, displayable_listings};

use crate::error::{AppError, Result};
use crate::middleware::OrderContext;
use crate::services::{Notifications, PurchaseOutcome, buy_listing};
use crate::state::AppState;
use crate::vendure::{ShopApi, VendureError};

/// htmx event fired after the order changed; the header subtotal listens for it.
pub const ORDER_UPDATED_EVENT: &str = "order-updated";

/// Product card display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// Formatted as `{amount} {currency}`.
    pub price: String,
    /// `POST` target for the "Buy" button, with the id percent-encoded.
    pub buy_path: String,
}

impl From<ProductListing> for ProductView {
    fn from(listing: ProductListing) -> Self {
        let buy_path = format!("/products/{}/buy", urlencoding::encode(listing.id.as_str()));

        Self {
            id: listing.id.into_inner(),
            buy_path,
            name: listing.name,
            description: listing.description,
            image_url: listing.preview_image.unwrap_or_default(),
            price: listing.price.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

/// The observable phases of a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogPhase {
    Loading,
    Failed(String),
    Ready(Vec<ProductView>),
}

impl CatalogPhase {
    /// Build the phase for a finished fetch, keeping displayable listings
    /// in fetch order.
    #[must_use]
    pub fn from_fetch(result: std::result::Result<Vec<ProductListing>, VendureError>) -> Self {
        match result {
            Ok(listings) => Self::Ready(
                displayable_listings(listings)
                    .into_iter()
                    .map(ProductView::from)
                    .collect(),
            ),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch catalog");
                Self::Failed(e.to_string())
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[ProductView] {
        match self {
            Self::Ready(products) => products.as_slice(),
            _ => &[],
        }
    }
}

/// Catalog fragment template (for htmx).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_list.html")]
pub struct ProductListTemplate {
    pub catalog: CatalogPhase,
}

/// Toast fragment template (for htmx).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub messages: Vec<String>,
    pub duration_ms: u128,
}

/// Fetch the catalog and render it.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    ProductListTemplate {
        catalog: CatalogPhase::from_fetch(state.vendure().products().await),
    }
}

/// Add one unit of a listing to the order (htmx).
///
/// Always answers 200 with the toast fragment so a failed call stays
/// silent; a successful add also fires [`ORDER_UPDATED_EVENT`].
#[instrument(skip(state, context))]
pub async fn buy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    context: OrderContext,
) -> Result<Response> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("listing id must not be blank".to_string()));
    }

    let OrderContext {
        mut order,
        mut auth_token,
    } = context;
    let mut notifications = Notifications::new();

    let outcome = buy_listing(
        state.vendure(),
        &mut order,
        &mut auth_token,
        &mut notifications,
        &ListingId::new(id),
    )
    .await;

    let toast = ToastTemplate {
        messages: notifications.into_messages(),
        duration_ms: state.config().toast_duration.as_millis(),
    };

    Ok(match outcome {
        PurchaseOutcome::Added(_) => {
            (AppendHeaders([("HX-Trigger", ORDER_UPDATED_EVENT)]), toast).into_response()
        }
        PurchaseOutcome::Rejected(_) | PurchaseOutcome::Failed(_) => toast.into_response(),
    })
}
