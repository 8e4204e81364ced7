//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::order::format_sub_total;
use super::products::CatalogPhase;
use crate::filters;
use crate::middleware::OrderContext;
use crate::state::AppState;

/// Home page template: header with the running subtotal and the catalog.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub logo_url: String,
    pub sub_total: String,
    /// Always [`CatalogPhase::Loading`]; htmx loads the real catalog.
    pub catalog: CatalogPhase,
}

/// Display home page.
#[instrument(skip(state, context))]
pub async fn home(State(state): State<AppState>, context: OrderContext) -> impl IntoResponse {
    HomeTemplate {
        logo_url: state.config().logo_url.clone(),
        sub_total: format_sub_total(context.order.sub_total()),
        catalog: CatalogPhase::Loading,
    }
}
