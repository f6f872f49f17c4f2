//! Checkout route handlers.
//!
//! The one place the cart crosses a process boundary. Order of operations
//! for `place_order`:
//!
//! 1. Validate client-side (empty cart, missing address) - no network call
//!    is made for a draft that fails here.
//! 2. Obtain or reuse the checkout attempt's idempotency key.
//! 3. Capture payment if a payment token was supplied.
//! 4. Create the order at the backend.
//! 5. On success, clear the cart and the attempt key.
//!
//! Failures never clear the cart, so the user can retry without
//! re-entering items; a manual retry reuses the same idempotency key so
//! the backend and the gateway deduplicate. A payment that captures
//! followed by an order that fails is surfaced as its own error telling
//! the user not to retry payment.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::order::{FulfillmentChoice, OrderDraft, OrderValidationError};
use greenbasket_core::pricing::{PricingResult, price_cart};
use greenbasket_core::types::PickupSlotId;

use crate::backend::types::PlacedOrder;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::session as session_state;
use crate::state::AppState;

/// How the shopper wants the order fulfilled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentKind {
    Delivery,
    Pickup,
}

/// Place-order request body.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderBody {
    pub fulfillment: FulfillmentKind,
    /// Required when `fulfillment` is `pickup`.
    pub pickup_slot_id: Option<PickupSlotId>,
    pub delivery_instructions: Option<String>,
    pub tip: Option<Decimal>,
    /// One-time card token from the hosted payment SDK. When present the
    /// payment-integrated flow runs; when absent the order is created
    /// unpaid (pay on delivery).
    pub payment_token: Option<String>,
}

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: PlacedOrder,
    /// What the card was charged, when a payment ran.
    pub charged_amount: Option<Decimal>,
}

/// Pricing preview response.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub pricing: PricingResult,
    pub item_count: u32,
}

/// Pricing preview for the session cart under the active flow.
#[instrument(skip(state, session))]
pub async fn quote(State(state): State<AppState>, session: Session) -> Result<Json<QuoteResponse>> {
    let cart = session_state::load_cart(&session).await?;
    Ok(Json(QuoteResponse {
        pricing: price_cart(&cart, state.pricing()),
        item_count: cart.item_count(),
    }))
}

/// Validate, capture payment, and place the order.
#[instrument(skip(state, session, body))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<PlaceOrderBody>,
) -> Result<Json<CheckoutResponse>> {
    let cart = session_state::load_cart(&session).await?;

    // Resolve fulfillment before building the draft; a delivery order with
    // no selected address is rejected here, before any network call.
    let fulfillment = match body.fulfillment {
        FulfillmentKind::Delivery => {
            let address_id = session_state::selected_address(&session)
                .await?
                .ok_or(OrderValidationError::NoAddress)?;
            FulfillmentChoice::Delivery { address_id }
        }
        FulfillmentKind::Pickup => {
            let slot_id = body
                .pickup_slot_id
                .ok_or_else(|| AppError::BadRequest("pickup_slot_id is required".to_string()))?;
            FulfillmentChoice::Pickup { slot_id }
        }
    };

    // Rejects an empty cart - also before any network call
    let draft = OrderDraft::from_cart(&cart, fulfillment, body.delivery_instructions, body.tip)?;

    // One key per checkout attempt, reused across manual retries
    let idempotency_key = session_state::checkout_attempt(&session).await?;

    let preview = price_cart(&cart, state.pricing());
    let charge_amount = preview.total + body.tip.unwrap_or(Decimal::ZERO);

    // Payment-integrated flow: capture first, then create the order.
    let (payment_id, client_calculated_amount) = match body.payment_token.as_deref() {
        Some(token) => {
            let payment = state
                .payments()
                .create_payment(token, charge_amount, idempotency_key)
                .await?;
            (Some(payment.id), Some(charge_amount))
        }
        None => (None, None),
    };
    let payment_captured = payment_id.is_some();

    let order = state
        .backend()
        .create_order(
            &user_id,
            &draft,
            idempotency_key,
            client_calculated_amount,
            payment_id,
        )
        .await
        .map_err(|err| {
            // The cart and the idempotency key stay in the session either
            // way; only the error shape differs.
            if payment_captured {
                AppError::PaymentCapturedOrderFailed(err)
            } else {
                AppError::Backend(err)
            }
        })?;

    // Success: the cart and the attempt key are done
    session_state::finish_checkout_attempt(&session).await?;

    tracing::info!(order_id = %order.id, "order placed");

    Ok(Json(CheckoutResponse {
        order,
        charged_amount: payment_captured.then_some(charge_amount),
    }))
}
