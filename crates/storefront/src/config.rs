//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `VENDURE_SHOP_API_URL` - Vendure Shop API endpoint (e.g., <https://shop.example.com/shop-api>)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_LOGO_URL` - Header logo image URL
//! - `STOREFRONT_TOAST_DURATION_MS` - Notification auto-dismiss delay (default: 5500)
//! - `VENDURE_CHANNEL_TOKEN` - Channel token sent as `vendure-token`
//! - `VENDURE_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default header logo.
pub const DEFAULT_LOGO_URL: &str =
    "https://santex.wpengine.com/wp-content/uploads/2019/02/logo-santex@3x.png";

/// Default notification auto-dismiss delay in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5500;

/// Default catalog cache lifetime in seconds.
pub const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Header logo image URL
    pub logo_url: String,
    /// How long a notification stays on screen
    pub toast_duration: Duration,
    /// Vendure Shop API configuration
    pub vendure: VendureConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Vendure Shop API configuration.
///
/// Implements `Debug` manually to redact the channel token.
#[derive(Clone)]
pub struct VendureConfig {
    /// Shop API GraphQL endpoint
    pub shop_api_url: Url,
    /// Channel token for multi-channel setups
    pub channel_token: Option<SecretString>,
    /// Lifetime of cached catalog responses
    pub catalog_cache_ttl: Duration,
}

impl std::fmt::Debug for VendureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendureConfig")
            .field("shop_api_url", &self.shop_api_url.as_str())
            .field(
                "channel_token",
                &self.channel_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", &get_env_or_default("STOREFRONT_HOST", "127.0.0.1"))?;
        let port = parse_env("STOREFRONT_PORT", &get_env_or_default("STOREFRONT_PORT", "3000"))?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let logo_url = get_env_or_default("STOREFRONT_LOGO_URL", DEFAULT_LOGO_URL);
        let toast_duration_ms: u64 = parse_env(
            "STOREFRONT_TOAST_DURATION_MS",
            &get_env_or_default(
                "STOREFRONT_TOAST_DURATION_MS",
                &DEFAULT_TOAST_DURATION_MS.to_string(),
            ),
        )?;

        let vendure = VendureConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate(
            "SENTRY_SAMPLE_RATE",
            &get_env_or_default("SENTRY_SAMPLE_RATE", "1.0"),
        )?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
        )?;

        Ok(Self {
            host,
            port,
            base_url,
            logo_url,
            toast_duration: Duration::from_millis(toast_duration_ms),
            vendure,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl VendureConfig {
    /// Build a configuration for `shop_api_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not http(s).
    pub fn new(shop_api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            shop_api_url: parse_shop_api_url(shop_api_url)?,
            channel_token: None,
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let shop_api_url = parse_shop_api_url(&get_required_env("VENDURE_SHOP_API_URL")?)?;
        let channel_token = get_optional_env("VENDURE_CHANNEL_TOKEN").map(SecretString::from);
        let ttl_secs: u64 = parse_env(
            "VENDURE_CATALOG_CACHE_TTL_SECS",
            &get_env_or_default(
                "VENDURE_CATALOG_CACHE_TTL_SECS",
                &DEFAULT_CATALOG_CACHE_TTL_SECS.to_string(),
            ),
        )?;

        Ok(Self {
            shop_api_url,
            channel_token,
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a raw value, attributing failures to `key`.
fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, raw: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, raw)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Parse the Shop API endpoint; only http and https are accepted.
fn parse_shop_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("VENDURE_SHOP_API_URL".to_string(), e.to_string())
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "VENDURE_SHOP_API_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            toast_duration: Duration::from_millis(DEFAULT_TOAST_DURATION_MS),
            vendure: VendureConfig::new("http://localhost:3001/shop-api").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_shop_api_url_accepts_http() {
        let url = parse_shop_api_url("https://demo.vendure.io/shop-api").unwrap();
        assert_eq!(url.path(), "/shop-api");
    }

    #[test]
    fn test_parse_shop_api_url_rejects_other_schemes() {
        let err = parse_shop_api_url("ftp://demo.vendure.io/shop-api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_shop_api_url_rejects_garbage() {
        assert!(parse_shop_api_url("not a url").is_err());
    }

    #[test]
    fn test_parse_env_reports_key() {
        let err = parse_env::<u16>("STOREFRONT_PORT", "70000").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }

    #[test]
    fn test_parse_rate_bounds() {
        assert!((parse_rate("R", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_rate("R", "1.5").is_err());
        assert!(parse_rate("R", "-0.1").is_err());
    }

    #[test]
    fn test_vendure_config_debug_redacts_token() {
        let mut config = VendureConfig::new("http://localhost:3001/shop-api").unwrap();
        config.channel_token = Some(SecretString::from("super_secret_channel_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:3001"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_channel_token"));
    }
}
