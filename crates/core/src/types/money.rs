//! Money helpers over decimal arithmetic.
//!
//! All monetary amounts are `rust_decimal::Decimal` in the currency's
//! standard unit (dollars, not cents). Floats never touch money paths.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to 2 decimal places for display.
///
/// Midpoints round away from zero ($0.125 -> $0.13), matching how the
/// upstream backend presents totals.
#[must_use]
pub fn display_round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a dollar amount to minor units (cents) for the payments API.
///
/// The amount is display-rounded first so $10.999 charges 1100 cents, not
/// a truncated 1099. Returns `None` if the result does not fit in `i64`
/// cents (never the case for real order totals).
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (display_round(amount) * Decimal::from(100)).to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_display_round_two_places() {
        assert_eq!(display_round(d("10.005")), d("10.01"));
        assert_eq!(display_round(d("10.004")), d("10.00"));
        assert_eq!(display_round(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(d("35.00")), Some(3500));
        assert_eq!(to_minor_units(d("5.99")), Some(599));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
        // Rounds before converting
        assert_eq!(to_minor_units(d("10.999")), Some(1100));
    }
}
