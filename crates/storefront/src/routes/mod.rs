//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the backend)
//!
//! # Catalog
//! GET  /stores                 - Store listing
//! POST /stores/select          - Select the active store (clears cart on change)
//! GET  /products               - Product listing for the active store
//!
//! # Cart
//! GET  /cart                   - Cart contents with pricing preview
//! POST /cart/add               - Add one unit of a product
//! POST /cart/remove            - Remove one unit of a product
//! POST /cart/clear             - Empty the cart
//!
//! # Addresses
//! GET    /addresses            - List saved addresses
//! POST   /addresses            - Create an address
//! PUT    /addresses/{id}       - Update an address
//! DELETE /addresses/{id}       - Delete an address
//! POST   /addresses/{id}/primary - Mark as primary
//! POST   /addresses/{id}/select  - Select for the current checkout
//!
//! # Checkout
//! GET  /checkout/quote         - Pricing preview for the active flow
//! POST /checkout               - Validate, capture payment, place the order
//! ```

pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(catalog::stores))
        .route("/stores/select", post(catalog::select_store))
        .route("/products", get(catalog::products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::list).post(addresses::create))
        .route(
            "/{id}",
            put(addresses::update).delete(addresses::delete),
        )
        .route("/{id}/primary", post(addresses::set_primary))
        .route("/{id}/select", post(addresses::select))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/quote", get(checkout::quote))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/addresses", address_routes())
        .nest("/checkout", checkout_routes())
}
