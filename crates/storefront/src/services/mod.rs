//! External service clients.

pub mod payments;
