//! End-to-end storefront tests against a fake Shop API.
//!
//! Run with: `cargo test -p vendure-storefront-integration-tests`

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use vendure_storefront::services::PURCHASE_THANKS;
use vendure_storefront_integration_tests::{
    FakeShopConfig, TestContext, catalog_body, error_body, error_result, new_browser, product,
    with_channel_token,
};

fn hx_trigger(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

// =============================================================================
// Home page and catalog
// =============================================================================

#[tokio::test]
async fn test_home_page_renders_loading_catalog_and_empty_subtotal() {
    let ctx = TestContext::start(FakeShopConfig::default()).await;

    let (status, html) = ctx.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Loading..."));
    assert!(html.contains("hx-get=\"/products\""));
    assert!(html.contains("id=\"order-subtotal\""));
    assert!(html.contains("$ 0"));
    assert!(html.contains(vendure_storefront::config::DEFAULT_LOGO_URL));
    // The home page itself never fetches the catalog.
    assert!(ctx.shop.requests_for("GetProducts").is_empty());
}

#[tokio::test]
async fn test_catalog_fragment_lists_only_displayable_products() {
    let ctx = TestContext::start(FakeShopConfig {
        catalog: catalog_body(vec![
            product("1", "Product 1", "Description 1", Some("preview1.jpg"), Some(100)),
            product("2", "No Image", "Description 2", None, Some(200)),
            product("3", "Blank", "   ", Some("preview3.jpg"), Some(300)),
            product("4", "Free", "Description 4", Some("preview4.jpg"), Some(0)),
            product("5", "No Variant", "Description 5", Some("preview5.jpg"), None),
            product("6", "Product 6", "Description 6", Some("preview6.jpg"), Some(600)),
        ]),
        ..FakeShopConfig::default()
    })
    .await;

    let (status, html) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("class=\"product-card\"").count(), 2);
    assert!(html.contains("Product 1"));
    assert!(html.contains("Price: 100 USD"));
    assert!(html.contains("src=\"preview1.jpg\""));
    assert!(html.contains("hx-post=\"/products/1/buy\""));
    assert!(html.contains("Product 6"));
    for hidden in ["No Image", "Blank", "Free", "No Variant"] {
        assert!(!html.contains(hidden), "{hidden} should be hidden");
    }

    let first = html.find("Product 1").unwrap();
    let last = html.find("Product 6").unwrap();
    assert!(first < last, "fetch order is preserved");
}

#[tokio::test]
async fn test_catalog_shows_listings_in_any_currency() {
    let ctx = TestContext::start(FakeShopConfig {
        catalog: catalog_body(vec![json!({
            "id": "9",
            "name": "Yen Product",
            "description": "Priced in yen",
            "assets": [{ "preview": "yen.jpg" }],
            "variants": [{ "price": 1500, "currencyCode": "JPY" }],
        })]),
        ..FakeShopConfig::default()
    })
    .await;

    let (_, html) = ctx.get("/products").await;

    assert_eq!(html.matches("class=\"product-card\"").count(), 1);
    assert!(html.contains("Price: 1500 JPY"));
}

#[tokio::test]
async fn test_catalog_fetch_error_renders_message() {
    let ctx = TestContext::start(FakeShopConfig {
        catalog: error_body("Network error"),
        ..FakeShopConfig::default()
    })
    .await;

    let (status, html) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error: Network error"));
    assert!(!html.contains("product-card"));
    assert!(!html.contains("Loading..."));
}

#[tokio::test]
async fn test_catalog_server_error_renders_status() {
    let ctx = TestContext::start(FakeShopConfig {
        catalog_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..FakeShopConfig::default()
    })
    .await;

    let (status, html) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error: Shop API returned 500"));
    assert!(!html.contains("product-card"));
}

#[tokio::test]
async fn test_catalog_is_cached_between_requests() {
    let ctx = TestContext::start(FakeShopConfig::default()).await;

    let (_, first) = ctx.get("/products").await;
    let (_, second) = ctx.get("/products").await;

    assert_eq!(first, second);
    assert_eq!(ctx.shop.requests_for("GetProducts").len(), 1);
}

#[tokio::test]
async fn test_channel_token_is_sent_to_shop_api() {
    let ctx = TestContext::start_with(FakeShopConfig::default(), |config| {
        with_channel_token(config, "default-channel");
    })
    .await;

    ctx.get("/products").await;
    ctx.buy("1").await;

    let requests = ctx.shop.requests();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.channel_token.as_deref(), Some("default-channel"));
    }
}

// =============================================================================
// Buying
// =============================================================================

#[tokio::test]
async fn test_buy_adds_item_and_updates_subtotal() {
    let ctx = TestContext::start(FakeShopConfig::default()).await;
    ctx.get("/").await;

    let response = ctx.buy("1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response).as_deref(), Some("order-updated"));
    let html = response.text().await.unwrap();
    assert_eq!(html.matches(PURCHASE_THANKS).count(), 1);
    assert!(html.contains("data-duration=\"5500\""));

    let (_, subtotal) = ctx.get("/order/subtotal").await;
    assert!(subtotal.contains("$ 100"));

    let adds = ctx.shop.requests_for("AddItemToOrder");
    assert_eq!(adds.len(), 1);
    assert_eq!(
        adds[0].variables,
        json!({ "productVariantId": "1", "quantity": 1 })
    );
    assert_eq!(adds[0].authorization, None);
}

#[tokio::test]
async fn test_opaque_listing_id_round_trips_through_buy() {
    let ctx = TestContext::start(FakeShopConfig {
        catalog: catalog_body(vec![product(
            "gid/7",
            "Slashed",
            "Id with a slash",
            Some("slash.jpg"),
            Some(100),
        )]),
        ..FakeShopConfig::default()
    })
    .await;

    let (_, html) = ctx.get("/products").await;
    assert!(html.contains("hx-post=\"/products/gid%2F7/buy\""));

    let response = ctx.buy("gid%2F7").await;
    assert_eq!(response.status(), StatusCode::OK);

    let adds = ctx.shop.requests_for("AddItemToOrder");
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].variables["productVariantId"], "gid/7");
}

#[tokio::test]
async fn test_issued_auth_token_is_forwarded_on_next_buy() {
    let ctx = TestContext::start(FakeShopConfig {
        issued_token: Some("token-abc".to_string()),
        ..FakeShopConfig::default()
    })
    .await;

    ctx.buy("1").await;
    ctx.buy("2").await;

    let adds = ctx.shop.requests_for("AddItemToOrder");
    assert_eq!(adds.len(), 2);
    assert_eq!(adds[0].authorization, None);
    assert_eq!(adds[1].authorization.as_deref(), Some("Bearer token-abc"));
}

#[tokio::test]
async fn test_rejected_buy_is_silent_and_keeps_order() {
    let ctx = TestContext::start(FakeShopConfig {
        add_item: error_result(
            "InsufficientStockError",
            "INSUFFICIENT_STOCK_ERROR",
            "Only 0 items were added to the order due to insufficient stock",
        ),
        ..FakeShopConfig::default()
    })
    .await;

    let response = ctx.buy("1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response), None);
    let html = response.text().await.unwrap();
    assert!(!html.contains(PURCHASE_THANKS));

    let (_, subtotal) = ctx.get("/order/subtotal").await;
    assert!(subtotal.contains("$ 0"));
}

#[tokio::test]
async fn test_unrecognized_result_is_silent() {
    let ctx = TestContext::start(FakeShopConfig {
        add_item: json!({ "__typename": "SomethingNew" }),
        ..FakeShopConfig::default()
    })
    .await;

    let response = ctx.buy("1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response), None);
    assert!(!response.text().await.unwrap().contains(PURCHASE_THANKS));

    let (_, subtotal) = ctx.get("/order/subtotal").await;
    assert!(subtotal.contains("$ 0"));
}

#[tokio::test]
async fn test_order_is_scoped_to_browser_session() {
    let ctx = TestContext::start(FakeShopConfig::default()).await;
    ctx.buy("1").await;

    let (_, own) = ctx.get("/order/subtotal").await;
    assert!(own.contains("$ 100"));

    let other = new_browser()
        .get(ctx.url("/order/subtotal"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(other.contains("$ 0"));
}

#[tokio::test]
async fn test_latest_order_snapshot_wins() {
    let ctx = TestContext::start(FakeShopConfig::default()).await;

    ctx.buy("1").await;
    ctx.buy("1").await;

    // The fake always answers with the same snapshot, so the subtotal is
    // replaced rather than accumulated.
    let (_, subtotal) = ctx.get("/order/subtotal").await;
    assert!(subtotal.contains("$ 100"));
    assert!(!subtotal.contains("$ 200"));
}
