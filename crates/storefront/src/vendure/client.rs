//! Shop API client implementation.
//!
//! Uses `graphql_client` generated types with `reqwest` 0.13 for HTTP.
//! Caches the catalog using `moka`.

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;
use vendure_storefront_core::ProductListing;

use super::conversions::{convert_add_item_result, convert_product_list};
use super::queries::{AddItemToOrder, GetProducts, add_item_to_order, get_products};
use super::types::{AddItemRequest, AddItemResponse};
use super::{AUTH_TOKEN_HEADER, CHANNEL_TOKEN_HEADER, GraphQLError, ShopApi, VendureError};
use crate::config::VendureConfig;

/// Cache key for the catalog listing.
const PRODUCTS_CACHE_KEY: &str = "products";

/// How much of an unexpected body to keep in logs and errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the Vendure Shop API.
#[derive(Clone)]
pub struct VendureClient {
    inner: Arc<VendureClientInner>,
}

struct VendureClientInner {
    client: reqwest::Client,
    endpoint: Url,
    channel_token: Option<SecretString>,
    cache: Cache<&'static str, Vec<ProductListing>>,
}

/// Response data plus the session token header, if one was issued.
struct Executed<T> {
    data: T,
    auth_token: Option<String>,
}

impl VendureClient {
    /// Create a new Shop API client.
    #[must_use]
    pub fn new(config: &VendureConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(VendureClientInner {
                client: reqwest::Client::new(),
                endpoint: config.shop_api_url.clone(),
                channel_token: config.channel_token.clone(),
                cache,
            }),
        }
    }

    /// The Shop API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        auth_token: Option<&str>,
    ) -> Result<Executed<Q::ResponseData>, VendureError> {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request_body);

        if let Some(token) = &self.inner.channel_token {
            request = request.header(CHANNEL_TOKEN_HEADER, token.expose_secret());
        }
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(VendureError::RateLimited(retry_after));
        }

        let issued_token = auth_token_from(response.headers());

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text),
                "Shop API returned non-success status"
            );
            return Err(VendureError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %excerpt(&response_text),
                    "Failed to parse Shop API response"
                );
                return Err(VendureError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(VendureError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => s,
                                    graphql_client::PathFragment::Index(i) => i.to_string(),
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        let data = response.data.ok_or_else(|| {
            tracing::error!(
                body = %excerpt(&response_text),
                "Shop API response has no data and no errors"
            );
            VendureError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })?;

        Ok(Executed {
            data,
            auth_token: issued_token,
        })
    }
}

impl ShopApi for VendureClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<ProductListing>, VendureError> {
        if let Some(products) = self.inner.cache.get(&PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let executed = self
            .execute::<GetProducts>(get_products::Variables, None)
            .await?;
        let products = convert_product_list(executed.data);

        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY, products.clone())
            .await;

        Ok(products)
    }

    #[instrument(
        skip(self, request),
        fields(
            product_variant_id = %request.product_variant_id,
            quantity = request.quantity,
            has_session = request.auth_token.is_some(),
        )
    )]
    async fn add_item_to_order(
        &self,
        request: AddItemRequest,
    ) -> Result<AddItemResponse, VendureError> {
        let variables = add_item_to_order::Variables {
            product_variant_id: request.product_variant_id.into_inner(),
            quantity: i64::from(request.quantity),
        };

        let executed = self
            .execute::<AddItemToOrder>(variables, request.auth_token.as_deref())
            .await?;

        Ok(AddItemResponse {
            result: convert_add_item_result(executed.data.add_item_to_order)?,
            auth_token: executed.auth_token,
        })
    }
}

fn auth_token_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_auth_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(auth_token_from(&headers), None);

        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(auth_token_from(&headers), None);

        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("abc123"));
        assert_eq!(auth_token_from(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT_CHARS + 10);
        assert_eq!(excerpt(&body).chars().count(), BODY_EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_new_uses_configured_endpoint() {
        let config = VendureConfig::new("http://localhost:3001/shop-api").unwrap();
        let client = VendureClient::new(&config);
        assert_eq!(client.endpoint().as_str(), "http://localhost:3001/shop-api");
    }
}
