//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENBASKET_BASE_URL` - Public URL for the storefront
//! - `BACKEND_GRAPHQL_URL` - GraphQL endpoint of the marketplace backend
//! - `BACKEND_API_TOKEN` - Bearer token for the backend API
//! - `PAYMENTS_ACCESS_TOKEN` - Payments API access token
//! - `PAYMENTS_LOCATION_ID` - Payments location identifier
//!
//! ## Optional
//! - `GREENBASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `GREENBASKET_PORT` - Listen port (default: 3000)
//! - `PAYMENTS_BASE_URL` - Payments API base URL (default: Square production)
//! - `PRICING_FLOW` - `quick-cart` or `full-checkout` (default: full-checkout)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use greenbasket_core::pricing::PricingConfig;
use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 20;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
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
    /// Marketplace backend GraphQL configuration
    pub backend: BackendConfig,
    /// Payments API configuration
    pub payments: PaymentsConfig,
    /// Which pricing flow this deployment runs
    pub pricing_flow: PricingFlow,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Marketplace backend GraphQL API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct BackendConfig {
    /// GraphQL endpoint URL
    pub graphql_url: String,
    /// Bearer token for server-to-server calls
    pub api_token: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("graphql_url", &self.graphql_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Payments API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// Payments API base URL
    pub base_url: String,
    /// Access token (server-side only)
    pub access_token: SecretString,
    /// Location the payments are attributed to
    pub location_id: String,
}

impl std::fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("location_id", &self.location_id)
            .finish()
    }
}

/// The two pricing rule sets observed across checkout surfaces.
///
/// They are deliberately not merged; which one is live is a product
/// decision made per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingFlow {
    /// Flat $5.99 delivery fee with an 8% client-side tax estimate.
    QuickCart,
    /// Tiered $5/$10 delivery fee; tax deferred to the backend.
    #[default]
    FullCheckout,
}

impl PricingFlow {
    /// The pricing configuration for this flow.
    #[must_use]
    pub fn pricing_config(self) -> PricingConfig {
        match self {
            Self::QuickCart => PricingConfig::quick_cart(),
            Self::FullCheckout => PricingConfig::full_checkout(),
        }
    }
}

impl std::str::FromStr for PricingFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick-cart" => Ok(Self::QuickCart),
            "full-checkout" => Ok(Self::FullCheckout),
            _ => Err(format!(
                "invalid pricing flow: {s} (expected quick-cart or full-checkout)"
            )),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("GREENBASKET_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GREENBASKET_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("GREENBASKET_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GREENBASKET_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_validated_url("GREENBASKET_BASE_URL")?;
        let pricing_flow = get_env_or_default("PRICING_FLOW", "full-checkout")
            .parse::<PricingFlow>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRICING_FLOW".to_string(), e))?;

        let backend = BackendConfig::from_env()?;
        let payments = PaymentsConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            payments,
            pricing_flow,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            graphql_url: get_validated_url("BACKEND_GRAPHQL_URL")?,
            api_token: get_validated_secret("BACKEND_API_TOKEN")?,
        })
    }
}

impl PaymentsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("PAYMENTS_BASE_URL", "https://connect.squareup.com"),
            access_token: get_validated_secret("PAYMENTS_ACCESS_TOKEN")?,
            location_id: get_required_env("PAYMENTS_LOCATION_ID")?,
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not a placeholder and meets minimum length.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Load a required environment variable that must parse as an absolute URL.
fn get_validated_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here-0123456789", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme1234567890123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_too_short() {
        let result = validate_secret_strength("aB3x9mK2q", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3x9mK2qnL5pQ7rT0uW4zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_pricing_flow_parse() {
        assert_eq!(
            "quick-cart".parse::<PricingFlow>().unwrap(),
            PricingFlow::QuickCart
        );
        assert_eq!(
            "full-checkout".parse::<PricingFlow>().unwrap(),
            PricingFlow::FullCheckout
        );
        assert!("modal".parse::<PricingFlow>().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig {
                graphql_url: "http://localhost:4000/graphql".to_string(),
                api_token: SecretString::from("token"),
            },
            payments: PaymentsConfig {
                base_url: "https://connect.squareup.com".to_string(),
                access_token: SecretString::from("token"),
                location_id: "L123".to_string(),
            },
            pricing_flow: PricingFlow::default(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let backend = BackendConfig {
            graphql_url: "http://localhost:4000/graphql".to_string(),
            api_token: SecretString::from("super_private_backend_token"),
        };
        let payments = PaymentsConfig {
            base_url: "https://connect.squareup.com".to_string(),
            access_token: SecretString::from("super_private_payments_token"),
            location_id: "L123".to_string(),
        };

        let debug_output = format!("{backend:?} {payments:?}");

        assert!(debug_output.contains("localhost:4000"));
        assert!(debug_output.contains("L123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_backend_token"));
        assert!(!debug_output.contains("super_private_payments_token"));
    }
}
