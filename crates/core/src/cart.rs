//! The session cart: a mapping of product to line with four operations.
//!
//! The cart is transient per-session state. There is no server-side cart
//! entity - the backend only ever sees a cart once it is materialized into
//! an order draft at checkout. Because of that the cart is a plain value
//! type: no locking, no expiry, no persistence.
//!
//! # Invariants
//!
//! - A line's quantity is always >= 1. A remove that would reach 0 deletes
//!   the line instead of retaining it.
//! - Line keys are unique per product; insertion order is irrelevant.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A single cart line: one product at a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend product key.
    pub product_id: ProductId,
    /// Display name, carried for rendering only.
    pub name: String,
    /// Unit price at the time the line was added. Preview-only; the backend
    /// re-prices at order creation.
    pub unit_price: Decimal,
    /// Always >= 1 while the line exists.
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A product offered by the currently selected store.
///
/// The minimal shape the cart needs to open a line; the full catalog entry
/// lives in the storefront's backend types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
}

/// The cart for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: HashMap<ProductId, CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    ///
    /// Inserts a new line with quantity 1 if the product is absent,
    /// otherwise increments the existing line by 1. No upper bound is
    /// enforced here - stock validation happens server-side at order
    /// submission.
    pub fn add(&mut self, product: CartProduct) {
        self.lines
            .entry(product.product_id.clone())
            .and_modify(|line| line.quantity += 1)
            .or_insert(CartLine {
                product_id: product.product_id,
                name: product.name,
                unit_price: product.unit_price,
                quantity: 1,
            });
    }

    /// Remove one unit of a product.
    ///
    /// Decrements the line by 1; a line that would reach quantity 0 is
    /// deleted. A no-op when the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) {
        let Some(line) = self.lines.get_mut(product_id) else {
            return;
        };

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.remove(product_id);
        }
    }

    /// Sum of unit price times quantity over all lines.
    ///
    /// `Decimal::ZERO` for an empty cart.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Reset to an empty cart.
    ///
    /// Called after an order is successfully placed, or when the active
    /// store changes (products are store-scoped, so a store switch
    /// invalidates the cart contents).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count: sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn distinct_products(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.get(product_id)
    }

    /// Iterate over all lines in unspecified order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn product(id: &str, price: &str) -> CartProduct {
        CartProduct {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: d(price),
        }
    }

    #[test]
    fn test_add_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));

        let line = cart.line(&ProductId::new("apples")).expect("line exists");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, d("3.50"));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));
        cart.add(product("apples", "3.50"));
        cart.add(product("apples", "3.50"));

        let line = cart.line(&ProductId::new("apples")).expect("line exists");
        assert_eq!(line.quantity, 3);
        assert_eq!(cart.distinct_products(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));
        cart.add(product("apples", "3.50"));

        cart.remove(&ProductId::new("apples"));
        assert_eq!(
            cart.line(&ProductId::new("apples")).map(|l| l.quantity),
            Some(1)
        );

        cart.remove(&ProductId::new("apples"));
        assert!(cart.line(&ProductId::new("apples")).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));

        cart.remove(&ProductId::new("bananas"));

        // Existing lines untouched
        assert_eq!(cart.distinct_products(), 1);
        assert_eq!(
            cart.line(&ProductId::new("apples")).map(|l| l.quantity),
            Some(1)
        );

        // And on an empty cart
        let mut empty = Cart::new();
        empty.remove(&ProductId::new("anything"));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_no_line_ever_has_zero_quantity() {
        // Exercise an arbitrary interleaving of adds and removes and check
        // the invariant after every step.
        let mut cart = Cart::new();
        let ids = ["a", "b", "c"];
        let ops: [(usize, bool); 12] = [
            (0, true),
            (1, true),
            (0, true),
            (2, false),
            (0, false),
            (1, false),
            (1, false),
            (2, true),
            (0, false),
            (0, false),
            (2, false),
            (2, false),
        ];

        for (idx, is_add) in ops {
            let id = ids[idx];
            if is_add {
                cart.add(product(id, "1.00"));
            } else {
                cart.remove(&ProductId::new(id));
            }
            assert!(
                cart.lines().all(|line| line.quantity >= 1),
                "line with quantity 0 after op on {id}"
            );
        }
    }

    #[test]
    fn test_subtotal_matches_independent_recomputation() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));
        cart.add(product("apples", "3.50"));
        cart.add(product("milk", "2.25"));

        let expected: Decimal = cart
            .lines()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();
        assert_eq!(cart.subtotal(), expected);
        assert_eq!(cart.subtotal(), d("9.25"));
    }

    #[test]
    fn test_add_then_remove_round_trips() {
        let mut cart = Cart::new();
        cart.add(product("milk", "2.25"));
        let before = cart.clone();

        for _ in 0..4 {
            cart.add(product("apples", "3.50"));
        }
        for _ in 0..4 {
            cart.remove(&ProductId::new("apples"));
        }

        assert_eq!(cart, before);
    }

    #[test]
    fn test_subtotal_empty_cart_is_zero() {
        assert_eq!(Cart::new().subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_clear_resets_to_zero() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));
        cart.add(product("milk", "2.25"));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_cart_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(product("apples", "3.50"));
        cart.add(product("milk", "2.25"));
        cart.add(product("milk", "2.25"));

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
