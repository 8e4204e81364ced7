//! Integration tests for the Vendure storefront.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - a fake Shop API ([`FakeShop`]) answering `GetProducts` and
//!   `AddItemToOrder` from canned JSON and recording every request
//! - the real storefront router from [`vendure_storefront::app`]
//!
//! and drives the storefront with a cookie-keeping `reqwest` client, the
//! way a browser running htmx would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vendure-storefront-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use vendure_storefront::config::{
    DEFAULT_LOGO_URL, DEFAULT_TOAST_DURATION_MS, StorefrontConfig, VendureConfig,
};
use vendure_storefront::state::AppState;

/// Path the fake Shop API listens on.
pub const SHOP_API_PATH: &str = "/shop-api";

/// One request received by the fake Shop API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation_name: String,
    pub variables: Value,
    /// Raw `Authorization` header.
    pub authorization: Option<String>,
    /// Raw `vendure-token` header.
    pub channel_token: Option<String>,
}

/// Canned Shop API behaviour.
#[derive(Debug, Clone)]
pub struct FakeShopConfig {
    /// Full response body for `GetProducts`.
    pub catalog: Value,
    /// HTTP status for `GetProducts`.
    pub catalog_status: StatusCode,
    /// The `addItemToOrder` member returned by `AddItemToOrder`.
    pub add_item: Value,
    /// Token issued in `vendure-auth-token` on every add-item response.
    pub issued_token: Option<String>,
}

impl Default for FakeShopConfig {
    fn default() -> Self {
        Self {
            catalog: catalog_body(vec![
                product("1", "Product 1", "Description 1", Some("preview1.jpg"), Some(100)),
                product("2", "Product 2", "Description 2", Some("preview2.jpg"), Some(200)),
            ]),
            catalog_status: StatusCode::OK,
            add_item: order_result(100, 1),
            issued_token: None,
        }
    }
}

#[derive(Debug)]
struct FakeShopState {
    config: FakeShopConfig,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Handle to a running fake Shop API.
#[derive(Debug, Clone)]
pub struct FakeShop {
    addr: SocketAddr,
    state: Arc<FakeShopState>,
}

impl FakeShop {
    /// Start the fake Shop API on an ephemeral port.
    pub async fn start(config: FakeShopConfig) -> Self {
        let state = Arc::new(FakeShopState {
            config,
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route(SHOP_API_PATH, post(graphql))
            .with_state(Arc::clone(&state));

        let addr = serve(router).await;
        Self { addr, state }
    }

    /// Shop API endpoint URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}{SHOP_API_PATH}", self.addr)
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Requests for one operation.
    #[must_use]
    pub fn requests_for(&self, operation_name: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.operation_name == operation_name)
            .collect()
    }
}

async fn graphql(
    State(state): State<Arc<FakeShopState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let request = RecordedRequest {
        operation_name: body["operationName"].as_str().unwrap_or_default().to_string(),
        variables: body["variables"].clone(),
        authorization: header("authorization"),
        channel_token: header("vendure-token"),
    };
    let operation_name = request.operation_name.clone();
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(request);
    }

    let config = &state.config;
    match operation_name.as_str() {
        "GetProducts" => (config.catalog_status, Json(config.catalog.clone())).into_response(),
        "AddItemToOrder" => {
            let body = Json(json!({ "data": { "addItemToOrder": config.add_item.clone() } }));
            match &config.issued_token {
                Some(token) => ([("vendure-auth-token", token.clone())], body).into_response(),
                None => body.into_response(),
            }
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": [{ "message": format!("unknown operation {other}") }] })),
        )
            .into_response(),
    }
}

/// A running storefront wired to a [`FakeShop`].
#[derive(Debug)]
pub struct TestContext {
    /// Cookie-keeping client, i.e. one browser session.
    pub client: Client,
    pub storefront_url: String,
    pub shop: FakeShop,
}

impl TestContext {
    /// Start a fake Shop API and a storefront using it.
    pub async fn start(shop_config: FakeShopConfig) -> Self {
        Self::start_with(shop_config, |_| {}).await
    }

    /// Like [`TestContext::start`], letting the caller adjust the storefront
    /// configuration first.
    pub async fn start_with(
        shop_config: FakeShopConfig,
        configure: impl FnOnce(&mut StorefrontConfig),
    ) -> Self {
        let shop = FakeShop::start(shop_config).await;

        let mut config = storefront_config(&shop.url());
        configure(&mut config);

        let addr = serve(vendure_storefront::app(AppState::new(config))).await;

        Self {
            client: new_browser(),
            storefront_url: format!("http://{addr}"),
            shop,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// GET `path` and return status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("storefront request failed");
        let status = response.status();
        (status, response.text().await.expect("readable body"))
    }

    /// Click "Buy" on listing `id`, as htmx would.
    pub async fn buy(&self, id: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/products/{id}/buy")))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("storefront request failed")
    }
}

/// A client with its own cookie jar.
#[must_use]
pub fn new_browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Storefront configuration pointing at `shop_api_url`.
#[must_use]
pub fn storefront_config(shop_api_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        logo_url: DEFAULT_LOGO_URL.to_string(),
        toast_duration: Duration::from_millis(DEFAULT_TOAST_DURATION_MS),
        vendure: VendureConfig::new(shop_api_url).expect("valid Shop API URL"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Set a channel token on a storefront configuration.
pub fn with_channel_token(config: &mut StorefrontConfig, token: &str) {
    config.vendure.channel_token = Some(SecretString::from(token));
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

// =============================================================================
// Canned Shop API payloads
// =============================================================================

/// A catalog item as the Shop API returns it.
#[must_use]
pub fn product(
    id: &str,
    name: &str,
    description: &str,
    preview: Option<&str>,
    price: Option<i64>,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": description,
        "assets": preview.map(|p| vec![json!({ "preview": p })]).unwrap_or_default(),
        "variants": price.map(|p| vec![json!({ "price": p, "currencyCode": "USD" })]).unwrap_or_default(),
    })
}

/// A successful `GetProducts` body.
#[must_use]
pub fn catalog_body(items: Vec<Value>) -> Value {
    json!({ "data": { "products": { "items": items } } })
}

/// A GraphQL error body.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "errors": [{ "message": message }] })
}

/// An `Order` member of the add-item union.
#[must_use]
pub fn order_result(sub_total: i64, total_quantity: i64) -> Value {
    json!({
        "__typename": "Order",
        "id": "1",
        "code": "T7GQ3LZ8",
        "subTotal": sub_total,
        "totalQuantity": total_quantity,
        "lines": [{ "id": "1", "quantity": total_quantity }],
    })
}

/// An `ErrorResult` member of the add-item union.
#[must_use]
pub fn error_result(typename: &str, error_code: &str, message: &str) -> Value {
    json!({
        "__typename": typename,
        "errorCode": error_code,
        "message": message,
    })
}
