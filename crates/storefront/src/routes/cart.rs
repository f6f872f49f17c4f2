//! Cart route handlers.
//!
//! The cart lives in the session; every mutation loads it, applies one of
//! the four cart operations, and saves it back. Responses carry the full
//! cart view with a fresh pricing preview so clients never compute money
//! themselves.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::pricing::{PricingResult, price_cart};
use greenbasket_core::types::ProductId;
use greenbasket_core::{Cart, CartProduct};

use crate::error::{AppError, Result};
use crate::models::session as session_state;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart display data: contents plus the derived pricing preview.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub pricing: PricingResult,
}

impl CartView {
    /// Render a cart under the deployment's pricing configuration.
    fn render(cart: &Cart, state: &AppState) -> Self {
        let mut items: Vec<CartItemView> = cart
            .lines()
            .map(|line| CartItemView {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();
        // The cart map has no inherent order; present a stable one
        items.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            items,
            item_count: cart.item_count(),
            pricing: price_cart(cart, state.pricing()),
        }
    }
}

/// Add/remove request body.
#[derive(Debug, Deserialize)]
pub struct CartItemBody {
    pub product_id: ProductId,
}

/// Show the cart with its pricing preview.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = session_state::load_cart(&session).await?;
    Ok(Json(CartView::render(&cart, &state)))
}

/// Add one unit of a product to the cart.
///
/// The product must exist in the active store's catalog - the price on the
/// line comes from the catalog, never from the client.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CartItemBody>,
) -> Result<Json<CartView>> {
    let Some(store_id) = session_state::selected_store(&session).await? else {
        return Err(AppError::BadRequest("no store selected".to_string()));
    };

    let product = state
        .backend()
        .get_product(&store_id, &body.product_id)
        .await?;

    let mut cart = session_state::load_cart(&session).await?;
    cart.add(CartProduct::from(&product));
    session_state::save_cart(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, &state)))
}

/// Remove one unit of a product from the cart.
///
/// A no-op when the product is not in the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CartItemBody>,
) -> Result<Json<CartView>> {
    let mut cart = session_state::load_cart(&session).await?;
    cart.remove(&body.product_id);
    session_state::save_cart(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, &state)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = Cart::new();
    session_state::save_cart(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, &state)))
}
