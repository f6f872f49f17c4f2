//! The two deployment pricing configurations, exercised through the same
//! selection path the binary uses (`PRICING_FLOW` parsing into a
//! `PricingConfig`).

use rust_decimal::Decimal;

use greenbasket_core::pricing::price_cart;
use greenbasket_core::types::ProductId;
use greenbasket_core::{Cart, CartProduct};
use greenbasket_storefront::config::PricingFlow;

fn d(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

fn cart_with_units(units: &[(&str, &str, u32)]) -> Cart {
    let mut cart = Cart::new();
    for (id, price, qty) in units {
        for _ in 0..*qty {
            cart.add(CartProduct {
                product_id: ProductId::new(*id),
                name: (*id).to_owned(),
                unit_price: d(price),
            });
        }
    }
    cart
}

// =============================================================================
// Flow Selection
// =============================================================================

#[test]
fn test_flow_parses_from_deployment_config_values() {
    assert_eq!(
        "quick-cart".parse::<PricingFlow>().expect("valid flow"),
        PricingFlow::QuickCart
    );
    assert_eq!(
        "full-checkout".parse::<PricingFlow>().expect("valid flow"),
        PricingFlow::FullCheckout
    );
    assert!("both".parse::<PricingFlow>().is_err());
}

#[test]
fn test_default_flow_is_full_checkout() {
    assert_eq!(PricingFlow::default(), PricingFlow::FullCheckout);
}

// =============================================================================
// The Same Cart Under Both Flows
// =============================================================================

#[test]
fn test_flows_diverge_on_the_same_cart() {
    // subtotal 25.00, three units across two products
    let cart = cart_with_units(&[("a", "10.00", 2), ("b", "5.00", 1)]);

    let full = price_cart(&cart, &PricingFlow::FullCheckout.pricing_config());
    assert_eq!(full.subtotal, d("25.00"));
    assert_eq!(full.tax, Decimal::ZERO);
    assert_eq!(full.delivery_fee, d("10"));
    assert_eq!(full.total, d("35.00"));

    let quick = price_cart(&cart, &PricingFlow::QuickCart.pricing_config());
    assert_eq!(quick.subtotal, d("25.00"));
    assert_eq!(quick.tax, d("2.00"));
    assert_eq!(quick.delivery_fee, d("5.99"));
    assert_eq!(quick.total, d("32.99"));
}

#[test]
fn test_single_unit_hits_the_lower_tier() {
    let cart = cart_with_units(&[("a", "10.00", 1)]);

    let full = price_cart(&cart, &PricingFlow::FullCheckout.pricing_config());
    assert_eq!(full.delivery_fee, d("5"));

    // The quick-cart flat fee does not tier
    let quick = price_cart(&cart, &PricingFlow::QuickCart.pricing_config());
    assert_eq!(quick.delivery_fee, d("5.99"));
}

#[test]
fn test_empty_cart_is_free_under_both_flows() {
    let cart = Cart::new();
    for flow in [PricingFlow::QuickCart, PricingFlow::FullCheckout] {
        let result = price_cart(&cart, &flow.pricing_config());
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.delivery_fee, Decimal::ZERO);
    }
}
