//! Core types for Greenbasket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{display_round, to_minor_units};
pub use status::OrderStatus;
