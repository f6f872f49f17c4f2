//! Greenbasket Core - Shared types library.
//!
//! This crate provides common types used across all Greenbasket components:
//! - `storefront` - Customer-facing storefront service
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The cart and pricing logic lives here so it can be tested in
//! complete isolation from the web layer.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money helpers, and statuses
//! - [`cart`] - The session cart: a product-to-line mapping with four operations
//! - [`pricing`] - Pure derivation of subtotal/tax/delivery-fee/total
//! - [`order`] - Order drafts, client-side validation, and idempotency keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartLine, CartProduct};
pub use order::{
    FulfillmentChoice, IdempotencyKey, OrderDraft, OrderLineItem, OrderValidationError,
};
pub use pricing::{DeliveryFeeSchedule, PricingConfig, PricingResult, TaxPolicy, price_cart};
pub use types::*;
