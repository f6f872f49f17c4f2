//! Pure pricing derivation: subtotal, tax, delivery fee, and total.
//!
//! Two checkout surfaces evolved two different pricing rules. They are kept
//! as explicit, named configurations rather than merged: which one a
//! deployment runs is product configuration, not something this module
//! decides. See [`PricingConfig::quick_cart`] and
//! [`PricingConfig::full_checkout`].
//!
//! Everything here is a pure function of the cart. The result is a PREVIEW:
//! the backend recomputes pricing at order creation and its total is
//! authoritative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::money::display_round;

/// How the delivery fee is derived from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryFeeSchedule {
    /// Step function of total item count: 0 items -> $0, 1 item ->
    /// `single_item`, 2+ items -> `multi_item`. Tier selection counts
    /// units, not distinct products.
    Tiered {
        single_item: Decimal,
        multi_item: Decimal,
    },
    /// A single flat fee whenever the subtotal is positive.
    Flat(Decimal),
}

impl DeliveryFeeSchedule {
    /// Derive the delivery fee for a cart.
    #[must_use]
    pub fn fee_for(&self, cart: &Cart) -> Decimal {
        match self {
            Self::Tiered {
                single_item,
                multi_item,
            } => match cart.item_count() {
                0 => Decimal::ZERO,
                1 => *single_item,
                _ => *multi_item,
            },
            Self::Flat(fee) => {
                if cart.subtotal() > Decimal::ZERO {
                    *fee
                } else {
                    Decimal::ZERO
                }
            }
        }
    }
}

/// How tax is derived client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxPolicy {
    /// Estimate as subtotal times a fixed rate.
    ClientEstimated { rate: Decimal },
    /// Show zero and defer to the tax the backend computes at order
    /// creation.
    ServerComputed,
}

impl TaxPolicy {
    /// Derive the tax preview for a subtotal.
    #[must_use]
    pub fn tax_on(&self, subtotal: Decimal) -> Decimal {
        match self {
            Self::ClientEstimated { rate } => subtotal * *rate,
            Self::ServerComputed => Decimal::ZERO,
        }
    }
}

/// Pricing rules for one checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub delivery_fee: DeliveryFeeSchedule,
    pub tax: TaxPolicy,
}

impl PricingConfig {
    /// The quick-cart (modal) flow: flat $5.99 delivery fee and an 8%
    /// client-side tax estimate.
    #[must_use]
    pub fn quick_cart() -> Self {
        Self {
            delivery_fee: DeliveryFeeSchedule::Flat(Decimal::new(599, 2)),
            tax: TaxPolicy::ClientEstimated {
                rate: Decimal::new(8, 2),
            },
        }
    }

    /// The full checkout page flow: tiered $5/$10 delivery fee, tax
    /// deferred to the backend.
    #[must_use]
    pub fn full_checkout() -> Self {
        Self {
            delivery_fee: DeliveryFeeSchedule::Tiered {
                single_item: Decimal::from(5),
                multi_item: Decimal::from(10),
            },
            tax: TaxPolicy::ServerComputed,
        }
    }
}

/// A derived pricing preview. Never stored; recomputed from the cart on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl PricingResult {
    /// The all-zero result for an empty cart.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Derive the pricing preview for a cart under the given configuration.
///
/// All components are display-rounded to 2 places, and the total is the
/// exact sum of the rounded components so the displayed arithmetic always
/// adds up.
#[must_use]
pub fn price_cart(cart: &Cart, config: &PricingConfig) -> PricingResult {
    if cart.is_empty() {
        return PricingResult::zero();
    }

    let subtotal = display_round(cart.subtotal());
    let tax = display_round(config.tax.tax_on(subtotal));
    let delivery_fee = display_round(config.delivery_fee.fee_for(cart));

    PricingResult {
        subtotal,
        tax,
        delivery_fee,
        total: subtotal + tax + delivery_fee,
    }
}
