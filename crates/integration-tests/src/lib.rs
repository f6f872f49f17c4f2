//! Integration tests for Greenbasket.
//!
//! These tests exercise the storefront library end to end at the type
//! level: cart mutation through pricing through order-draft assembly and
//! the HTTP error surface, without standing up a server or talking to the
//! real marketplace backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greenbasket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_checkout_flow` - Cart mutations through to the order wire shape
//! - `pricing_flows` - The two deployment pricing configurations
//! - `error_responses` - HTTP status and body mapping for failures
