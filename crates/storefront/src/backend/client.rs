//! Backend GraphQL client implementation.
//!
//! Uses `reqwest` for HTTP with `graphql_client`'s response envelope.
//! Caches stores and product lists using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use greenbasket_core::order::{IdempotencyKey, OrderDraft};
use greenbasket_core::types::{AddressId, StoreId, UserId};

use super::queries::{self, OrderInput};
use super::types::{Address, PlacedOrder, Product, Store, UserError};
use super::{BackendError, GraphQLError};
use crate::config::BackendConfig;

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
enum CacheValue {
    Stores(Vec<Store>),
    Products(Vec<Product>),
}

/// Client for the marketplace backend GraphQL API.
///
/// Provides type-safe access to the catalog, the address book, and order
/// creation. Catalog reads are cached for 5 minutes; mutations never are.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_url.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<V, D>(
        &self,
        query: &'static str,
        operation_name: &'static str,
        variables: V,
    ) -> Result<D, BackendError>
    where
        V: serde::Serialize,
        D: serde::de::DeserializeOwned,
    {
        let request_body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(&self.inner.api_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(BackendError::GraphQL(vec![GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
                path: vec![],
            }]));
        }

        let response: Response<D> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend GraphQL response"
                );
                return Err(BackendError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(BackendError::GraphQL(
                errors.into_iter().map(GraphQLError::from).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend GraphQL response has no data and no errors"
            );
            BackendError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    /// Collapse mutation user errors into a `BackendError::UserError`.
    fn check_user_errors(user_errors: Vec<UserError>) -> Result<(), BackendError> {
        if user_errors.is_empty() {
            return Ok(());
        }
        Err(BackendError::UserError(
            user_errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        ))
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get all stores in the marketplace.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_stores(&self) -> Result<Vec<Store>, BackendError> {
        let cache_key = "stores".to_string();

        if let Some(CacheValue::Stores(stores)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for stores");
            return Ok(stores);
        }

        let data: queries::GetStoresData = self
            .execute(queries::GET_STORES, "GetStores", queries::GetStoresVariables {})
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Stores(data.stores.clone()))
            .await;

        Ok(data.stores)
    }

    /// Get the product catalog for a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn get_products(&self, store_id: &StoreId) -> Result<Vec<Product>, BackendError> {
        let cache_key = format!("products:{store_id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data: queries::GetProductsData = self
            .execute(
                queries::GET_PRODUCTS,
                "GetProducts",
                queries::GetProductsVariables {
                    store_id: store_id.clone(),
                },
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(data.products.clone()))
            .await;

        Ok(data.products)
    }

    /// Look up one product in a store's catalog.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product is not in the store's catalog.
    #[instrument(skip(self), fields(store_id = %store_id, product_id = %product_id))]
    pub async fn get_product(
        &self,
        store_id: &StoreId,
        product_id: &greenbasket_core::types::ProductId,
    ) -> Result<Product, BackendError> {
        self.get_products(store_id)
            .await?
            .into_iter()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| BackendError::NotFound(format!("Product not found: {product_id}")))
    }

    // =========================================================================
    // Address Methods
    // =========================================================================

    /// List a user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_addresses(&self, user_id: &UserId) -> Result<Vec<Address>, BackendError> {
        let data: queries::GetAddressesData = self
            .execute(
                queries::GET_ADDRESSES,
                "GetAddresses",
                queries::GetAddressesVariables {
                    user_id: user_id.clone(),
                },
            )
            .await?;

        Ok(data.addresses)
    }

    /// Create a new address for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or user errors are returned.
    #[instrument(skip(self, address), fields(user_id = %user_id))]
    pub async fn create_address(
        &self,
        user_id: &UserId,
        address: String,
    ) -> Result<Address, BackendError> {
        let data: queries::CreateAddressData = self
            .execute(
                queries::CREATE_ADDRESS,
                "CreateAddress",
                queries::CreateAddressVariables {
                    user_id: user_id.clone(),
                    address,
                },
            )
            .await?;

        Self::check_user_errors(data.address_create.user_errors)?;
        data.address_create.address.ok_or_else(|| {
            BackendError::GraphQL(vec![GraphQLError {
                message: "Failed to create address".to_string(),
                path: vec![],
            }])
        })
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or user errors are returned.
    #[instrument(skip(self, address), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        id: &AddressId,
        address: String,
    ) -> Result<Address, BackendError> {
        let data: queries::UpdateAddressData = self
            .execute(
                queries::UPDATE_ADDRESS,
                "UpdateAddress",
                queries::UpdateAddressVariables {
                    id: id.clone(),
                    address,
                },
            )
            .await?;

        Self::check_user_errors(data.address_update.user_errors)?;
        data.address_update.address.ok_or_else(|| {
            BackendError::GraphQL(vec![GraphQLError {
                message: "Failed to update address".to_string(),
                path: vec![],
            }])
        })
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or user errors are returned.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<(), BackendError> {
        let data: queries::DeleteAddressData = self
            .execute(
                queries::DELETE_ADDRESS,
                "DeleteAddress",
                queries::DeleteAddressVariables { id: id.clone() },
            )
            .await?;

        Self::check_user_errors(data.address_delete.user_errors)
    }

    /// Mark an address as the user's primary.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or user errors are returned.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_primary_address(&self, id: &AddressId) -> Result<Address, BackendError> {
        let data: queries::SetPrimaryAddressData = self
            .execute(
                queries::SET_PRIMARY_ADDRESS,
                "SetPrimaryAddress",
                queries::SetPrimaryAddressVariables { id: id.clone() },
            )
            .await?;

        Self::check_user_errors(data.address_set_primary.user_errors)?;
        data.address_set_primary.address.ok_or_else(|| {
            BackendError::GraphQL(vec![GraphQLError {
                message: "Failed to set primary address".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Order Methods (never cached, never retried)
    // =========================================================================

    /// Create an order from a validated draft.
    ///
    /// The idempotency key lets the backend deduplicate manual retries;
    /// this client never retries automatically. `client_calculated_amount`
    /// is passed only in the payment flow for server-side verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or user errors are returned.
    #[instrument(skip(self, draft), fields(user_id = %user_id, idempotency_key = %idempotency_key))]
    pub async fn create_order(
        &self,
        user_id: &UserId,
        draft: &OrderDraft,
        idempotency_key: IdempotencyKey,
        client_calculated_amount: Option<Decimal>,
        payment_id: Option<String>,
    ) -> Result<PlacedOrder, BackendError> {
        let input = OrderInput::from_draft(
            user_id.clone(),
            draft,
            idempotency_key,
            client_calculated_amount,
            payment_id,
        );

        let data: queries::CreateOrderData = self
            .execute(
                queries::CREATE_ORDER,
                "CreateOrder",
                queries::CreateOrderVariables { input },
            )
            .await?;

        Self::check_user_errors(data.order_create.user_errors)?;
        data.order_create.order.ok_or_else(|| {
            BackendError::GraphQL(vec![GraphQLError {
                message: "Failed to create order".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate the cached product list for a store.
    pub async fn invalidate_products(&self, store_id: &StoreId) {
        self.inner
            .cache
            .invalidate(&format!("products:{store_id}"))
            .await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
