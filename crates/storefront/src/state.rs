//! Application state shared across handlers.

use std::sync::Arc;

use greenbasket_core::pricing::PricingConfig;

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::services::payments::{PaymentError, PaymentsClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    payments: PaymentsClient,
    pricing: PricingConfig,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the payments HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, PaymentError> {
        let backend = BackendClient::new(&config.backend);
        let payments = PaymentsClient::new(&config.payments)?;
        let pricing = config.pricing_flow.pricing_config();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                payments,
                pricing,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the payments client.
    #[must_use]
    pub fn payments(&self) -> &PaymentsClient {
        &self.inner.payments
    }

    /// The pricing configuration for this deployment's active flow.
    #[must_use]
    pub fn pricing(&self) -> &PricingConfig {
        &self.inner.pricing
    }
}
