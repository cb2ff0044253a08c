//! Currency rounding.
//!
//! Monetary leaf values are rounded to whole currency units at the point
//! they are computed or stored. Ratios are never passed through here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance below which two stored balances are considered equal.
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Rounds a monetary value to whole currency units, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("56129.03").unwrap()), Decimal::from(56129));
/// assert_eq!(round_currency(Decimal::from_str("2.5").unwrap()), Decimal::from(3));
/// assert_eq!(round_currency(Decimal::from_str("-2.5").unwrap()), Decimal::from(-3));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_down_below_half() {
        assert_eq!(round_currency(dec("19354.4999")), dec("19354"));
    }

    #[test]
    fn test_rounds_up_above_half() {
        assert_eq!(round_currency(dec("19354.8387")), dec("19355"));
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(round_currency(dec("0.5")), dec("1"));
        assert_eq!(round_currency(dec("-0.5")), dec("-1"));
        assert_eq!(round_currency(dec("1000.5")), dec("1001"));
    }

    #[test]
    fn test_whole_values_are_unchanged() {
        assert_eq!(round_currency(dec("10000")), dec("10000"));
        assert_eq!(round_currency(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_balance_tolerance_is_one_cent() {
        assert_eq!(balance_tolerance(), dec("0.01"));
    }
}
