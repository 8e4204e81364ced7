//! Security headers middleware for XSS and clickjacking protection.
//!
//! The CSP allows htmx from unpkg. Product images may come from any HTTPS
//! host or from the Shop API origin, since Vendure asset previews are
//! served by the shop's asset server (plain http in local setups).

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

/// Image sources allowed regardless of configuration.
const BASE_IMG_SRC: &str = "'self' https:";

/// Build the Content Security Policy, allowing images from `image_origin`.
#[must_use]
pub fn content_security_policy(image_origin: Option<&str>) -> String {
    let img_src = image_origin.map_or_else(
        || BASE_IMG_SRC.to_string(),
        |origin| format!("{BASE_IMG_SRC} {origin}"),
    );

    format!(
        "default-src 'none'; \
         script-src 'self' https://unpkg.com; \
         style-src 'self'; \
         img-src {img_src}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Header values computed once at startup.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    content_security_policy: HeaderValue,
}

impl SecurityHeaders {
    /// Headers for a storefront backed by the Shop API at `shop_api_url`.
    #[must_use]
    pub fn new(shop_api_url: &Url) -> Self {
        let origin = shop_api_url.origin();
        let image_origin = origin.is_tuple().then(|| origin.ascii_serialization());
        let policy = content_security_policy(image_origin.as_deref());

        Self {
            content_security_policy: HeaderValue::from_str(&policy)
                .unwrap_or_else(|_| HeaderValue::from_static("default-src 'none'")),
        }
    }
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying device features
/// - `Cache-Control: no-store, max-age=0` unless the route set its own
/// - `Cross-Origin-Opener-Policy: same-origin`
pub async fn security_headers_middleware(
    State(security): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CONTENT_SECURITY_POLICY, security.content_security_policy);

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             geolocation=(), \
             microphone=(), \
             payment=(), \
             usb=(), \
             interest-cohort=()",
        ),
    );

    // Order fragments are per visitor; static files set their own caching.
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn layer_for(shop_api_url: &str) -> SecurityHeaders {
        SecurityHeaders::new(&Url::parse(shop_api_url).unwrap())
    }

    async fn csp_for(shop_api_url: &str) -> String {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                layer_for(shop_api_url),
                security_headers_middleware,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response
            .headers()
            .get(CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_headers_are_applied() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                layer_for("https://shop.example.com/shop-api"),
                security_headers_middleware,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store, max-age=0");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("script-src 'self' https://unpkg.com"));
    }

    #[tokio::test]
    async fn test_route_cache_control_is_kept() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { ([(CACHE_CONTROL, "public, max-age=60")], "ok") }),
            )
            .layer(axum::middleware::from_fn_with_state(
                layer_for("https://shop.example.com/shop-api"),
                security_headers_middleware,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=60"
        );
    }

    #[tokio::test]
    async fn test_plain_http_shop_images_are_allowed() {
        let csp = csp_for("http://localhost:3000/shop-api").await;
        assert!(csp.contains("img-src 'self' https: http://localhost:3000;"));
        assert!(csp.contains("default-src 'none'"));
    }

    #[tokio::test]
    async fn test_https_shop_origin_keeps_port() {
        let csp = csp_for("https://shop.example.com:8443/shop-api").await;
        assert!(csp.contains("img-src 'self' https: https://shop.example.com:8443;"));
    }

    #[test]
    fn test_policy_without_origin() {
        let policy = content_security_policy(None);
        assert!(policy.contains("img-src 'self' https:;"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }
}
