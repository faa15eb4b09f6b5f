//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Unlike a lenient `unwrap_or_default`
//! conversion, non-finite inputs are rejected so a broken rate can never be
//! priced as zero.

use super::error::{PricingError, PricingResult};
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
pub const DECIMAL_PLACES: u32 = 2;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> PricingResult<()> {
    if !value.is_finite() {
        return Err(PricingError::invariant(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
pub fn to_decimal(value: f64, field_name: &str) -> PricingResult<Decimal> {
    require_finite(value, field_name)?;
    Decimal::from_f64(value).ok_or_else(|| {
        PricingError::invariant(format!("{} is out of range, got {}", field_name, value))
    })
}

/// Convert a non-negative f64 rate or amount to Decimal
pub fn non_negative(value: f64, field_name: &str) -> PricingResult<Decimal> {
    let d = to_decimal(value, field_name)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(PricingError::invariant(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    Ok(d)
}

/// Multiply two amounts; overflow is an invariant violation, not a panic
pub fn checked_mul(lhs: Decimal, rhs: Decimal, what: &str) -> PricingResult<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| PricingError::invariant(format!("{what} overflows")))
}

/// Add two amounts; overflow is an invariant violation, not a panic
pub fn checked_add(lhs: Decimal, rhs: Decimal, what: &str) -> PricingResult<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| PricingError::invariant(format!("{what} overflows")))
}

/// Round to currency precision
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole currency unit
#[inline]
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(to_decimal(f64::NAN, "rate").is_err());
        assert!(to_decimal(f64::INFINITY, "rate").is_err());
        assert!(to_decimal(f64::NEG_INFINITY, "rate").is_err());
        assert_eq!(to_decimal(0.75, "rate").unwrap(), dec(75, 2));
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(-0.01, "fee").is_err());
        assert_eq!(non_negative(0.0, "fee").unwrap(), Decimal::ZERO);
        assert_eq!(non_negative(-0.0, "fee").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(dec(1005, 3)), 1.01);
        assert_eq!(to_f64(dec(1004, 3)), 1.0);
        assert_eq!(round_whole(dec(425, 1)), dec(43, 0));
        assert_eq!(round_whole(dec(424, 1)), dec(42, 0));
    }

    #[test]
    fn test_decimal_avoids_float_drift() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        let sum = to_decimal(0.1, "a").unwrap() + to_decimal(0.2, "b").unwrap();
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_overflow_is_invariant() {
        let err = checked_mul(Decimal::MAX, Decimal::TWO, "printing charge").unwrap_err();
        assert!(matches!(err, PricingError::Invariant(_)));
        assert!(checked_add(Decimal::MAX, Decimal::ONE, "subtotal").is_err());
        assert_eq!(checked_mul(dec(75, 2), dec(10, 0), "x").unwrap(), dec(75, 1));
    }
}
