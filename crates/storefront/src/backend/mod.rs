//! Marketplace backend GraphQL client.
//!
//! # Architecture
//!
//! - All durable data (catalog, addresses, orders) lives behind the
//!   backend's GraphQL facade - the storefront keeps no database
//! - Query documents are hand-written const strings with typed serde
//!   variables and responses; `graphql_client::Response` is the envelope
//!   (the schema files for derive codegen are owned by the backend team)
//! - In-memory caching via `moka` for catalog reads (5 minute TTL);
//!   mutations are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use greenbasket_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! // Catalog reads (cached)
//! let stores = client.get_stores().await?;
//! let products = client.get_products(&stores[0].id).await?;
//!
//! // The one checkout hand-off
//! let placed = client.create_order(&user, &draft, key, None, None).await?;
//! ```

mod client;
pub mod queries;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from a mutation (e.g., out-of-stock line item).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the backend API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<String>,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(err: graphql_client::Error) -> Self {
        Self {
            message: err.message,
            path: err.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => s,
                        graphql_client::PathFragment::Index(i) => i.to_string(),
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            if e.path.is_empty() {
                e.message.clone()
            } else if e.message.is_empty() {
                format!("path: {}", e.path.join("."))
            } else {
                format!("{} (path: {})", e.message, e.path.join("."))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
