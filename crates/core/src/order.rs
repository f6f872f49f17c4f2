//! Order drafts: what the storefront hands to the backend at checkout.
//!
//! A draft carries product IDs and quantities only - unit prices are
//! deliberately absent so the backend never trusts client pricing. The
//! client's [`crate::pricing::PricingResult`] is a preview; the backend's
//! order total is authoritative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::Cart;
use crate::types::{AddressId, PickupSlotId, ProductId};

/// One order line: product and quantity, no price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// How the order reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FulfillmentChoice {
    Delivery { address_id: AddressId },
    Pickup { slot_id: PickupSlotId },
}

/// A validated-shape order ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub line_items: Vec<OrderLineItem>,
    pub fulfillment: FulfillmentChoice,
    pub delivery_instructions: Option<String>,
    pub tip: Option<Decimal>,
}

/// Client-side validation failures caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    /// The cart has no lines; there is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
    /// Delivery was chosen but no address is selected.
    #[error("no delivery address selected")]
    NoAddress,
}

impl OrderDraft {
    /// Build a draft from the cart and a fulfillment choice.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError::EmptyCart`] for an empty cart. The
    /// caller never issues a network call for a draft that fails here.
    pub fn from_cart(
        cart: &Cart,
        fulfillment: FulfillmentChoice,
        delivery_instructions: Option<String>,
        tip: Option<Decimal>,
    ) -> Result<Self, OrderValidationError> {
        if cart.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }

        let line_items = cart
            .lines()
            .map(|line| OrderLineItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            })
            .collect();

        Ok(Self {
            line_items,
            fulfillment,
            delivery_instructions,
            tip,
        })
    }
}

/// Checkout idempotency key.
///
/// Generated once per checkout attempt and reused if the user retries
/// manually, so the backend and the payment gateway can deduplicate. Never
/// regenerated on failure - only a successful order clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Generate a fresh key for a new checkout attempt.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;

    fn delivery() -> FulfillmentChoice {
        FulfillmentChoice::Delivery {
            address_id: AddressId::new("addr-1"),
        }
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let cart = Cart::new();
        let result = OrderDraft::from_cart(&cart, delivery(), None, None);
        assert_eq!(result, Err(OrderValidationError::EmptyCart));
    }

    #[test]
    fn test_draft_carries_quantities_but_no_prices() {
        let mut cart = Cart::new();
        for _ in 0..2 {
            cart.add(CartProduct {
                product_id: ProductId::new("apples"),
                name: "Apples".to_owned(),
                unit_price: "3.50".parse().expect("decimal"),
            });
        }

        let draft =
            OrderDraft::from_cart(&cart, delivery(), Some("leave at door".to_owned()), None)
                .expect("non-empty cart");

        assert_eq!(draft.line_items.len(), 1);
        let item = draft.line_items.first().expect("one line");
        assert_eq!(item.product_id, ProductId::new("apples"));
        assert_eq!(item.quantity, 2);

        // The wire shape has no price field at all
        let json = serde_json::to_value(&draft.line_items).expect("serialize");
        let first = json.get(0).expect("one element");
        assert!(first.get("unit_price").is_none());
        assert!(first.get("price").is_none());
    }

    #[test]
    fn test_fulfillment_serde_shape() {
        let json = serde_json::to_value(delivery()).expect("serialize");
        assert_eq!(json["kind"], "delivery");
        assert_eq!(json["address_id"], "addr-1");

        let pickup = FulfillmentChoice::Pickup {
            slot_id: PickupSlotId::new("slot-9"),
        };
        let json = serde_json::to_value(pickup).expect("serialize");
        assert_eq!(json["kind"], "pickup");
    }

    #[test]
    fn test_idempotency_keys_are_unique_and_stable() {
        let key = IdempotencyKey::generate();
        let other = IdempotencyKey::generate();
        assert_ne!(key, other);

        // Round-trips through serde unchanged (reused across retries)
        let json = serde_json::to_string(&key).expect("serialize");
        let back: IdempotencyKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, key);
    }
}
