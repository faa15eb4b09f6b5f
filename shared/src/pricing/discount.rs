//! Discount stacking: coupon first, then wallet
//!
//! The wallet only ever pays what is left after the coupon, so a coupon is
//! never computed on a wallet-reduced total.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{Coupon, DiscountType};
use crate::types::Timestamp;

use super::error::PricingResult;
use super::money::{checked_mul, non_negative, round_whole};

/// How a coupon takes part in a pricing run
#[derive(Debug, Clone, Copy, Default)]
pub enum CouponUse<'a> {
    #[default]
    None,
    /// New redemption: the validity gate runs first
    Redeem(&'a Coupon),
    /// Re-pricing an order that already redeemed this coupon
    Reapply(&'a Coupon),
}

/// Result of stacking discounts onto a subtotal
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiscountOutcome {
    pub coupon_discount: Decimal,
    pub wallet_used: Decimal,
    pub total_amount: Decimal,
}

/// Coupon discount on a subtotal, rounded to a whole currency unit
///
/// Percentage coupons are capped by `max_discount_amount`; flat coupons by
/// the subtotal.
pub fn coupon_discount(subtotal: Decimal, coupon: &Coupon) -> PricingResult<Decimal> {
    let value = non_negative(coupon.discount_value, "coupon discountValue")?;
    let discount = match coupon.discount_type {
        DiscountType::Percentage => {
            let raw = checked_mul(subtotal, value, "coupon discount")? / Decimal::ONE_HUNDRED;
            match coupon.max_discount_amount {
                Some(cap) => raw.min(non_negative(cap, "coupon maxDiscountAmount")?),
                None => raw,
            }
        }
        DiscountType::Flat => value.min(subtotal),
    };
    Ok(round_whole(discount))
}

/// Apply the coupon, then the wallet
///
/// `wallet_balance` is `Some` only when the customer chose to pay from the
/// wallet.
pub fn apply_discounts(
    subtotal: Decimal,
    coupon: CouponUse<'_>,
    wallet_balance: Option<Decimal>,
    now: Timestamp,
) -> PricingResult<DiscountOutcome> {
    let coupon_discount = match coupon {
        CouponUse::None => Decimal::ZERO,
        CouponUse::Redeem(coupon) => {
            coupon.check_redeemable(subtotal.to_f64().unwrap_or_default(), now)?;
            coupon_discount(subtotal, coupon)?
        }
        CouponUse::Reapply(coupon) => coupon_discount(subtotal, coupon)?,
    };

    let after_coupon = (subtotal - coupon_discount).max(Decimal::ZERO);
    let wallet_used = match wallet_balance {
        Some(balance) => balance.max(Decimal::ZERO).min(after_coupon),
        None => Decimal::ZERO,
    };
    let total_amount = (after_coupon - wallet_used).max(Decimal::ZERO);

    Ok(DiscountOutcome {
        coupon_discount,
        wallet_used,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::error::{PolicyRejection, PricingError};

    const NOW: i64 = 1_768_471_200_000;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn coupon(discount_type: DiscountType, value: f64, cap: Option<f64>) -> Coupon {
        Coupon {
            code: "TEST".to_string(),
            discount_type,
            discount_value: value,
            min_order_amount: 0.0,
            max_discount_amount: cap,
            usage_limit: Some(5),
            used_count: 0,
            valid_from: None,
            valid_till: None,
            is_active: true,
        }
    }

    #[test]
    fn test_coupon_then_wallet() {
        let c = coupon(DiscountType::Percentage, 20.0, Some(80.0));
        let outcome =
            apply_discounts(d("500"), CouponUse::Redeem(&c), Some(d("1000")), NOW).unwrap();
        // 20% of 500 is 100, capped at 80
        assert_eq!(outcome.coupon_discount, d("80"));
        assert_eq!(outcome.wallet_used, d("420"));
        assert_eq!(outcome.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_partial_wallet() {
        let outcome = apply_discounts(d("250"), CouponUse::None, Some(d("100")), NOW).unwrap();
        assert_eq!(outcome.wallet_used, d("100"));
        assert_eq!(outcome.total_amount, d("150"));

        let outcome = apply_discounts(d("250"), CouponUse::None, None, NOW).unwrap();
        assert_eq!(outcome.wallet_used, Decimal::ZERO);
        assert_eq!(outcome.total_amount, d("250"));
    }

    #[test]
    fn test_discount_rounds_to_whole_units() {
        let c = coupon(DiscountType::Percentage, 15.0, None);
        // 15% of 123.30 = 18.495 → 18
        assert_eq!(coupon_discount(d("123.30"), &c).unwrap(), d("18"));
        // 15% of 125 = 18.75 → 19
        assert_eq!(coupon_discount(d("125"), &c).unwrap(), d("19"));
        // 10% of 25 = 2.5 → 3, half away from zero
        let c = coupon(DiscountType::Percentage, 10.0, None);
        assert_eq!(coupon_discount(d("25"), &c).unwrap(), d("3"));
    }

    #[test]
    fn test_flat_coupon_capped_by_subtotal() {
        let c = coupon(DiscountType::Flat, 50.0, None);
        assert_eq!(coupon_discount(d("200"), &c).unwrap(), d("50"));
        assert_eq!(coupon_discount(d("30"), &c).unwrap(), d("30"));

        let outcome = apply_discounts(d("30"), CouponUse::Redeem(&c), Some(d("10")), NOW).unwrap();
        assert_eq!(outcome.total_amount, Decimal::ZERO);
        assert_eq!(outcome.wallet_used, Decimal::ZERO);
    }

    #[test]
    fn test_rounding_never_makes_total_negative() {
        let c = coupon(DiscountType::Flat, 10.0, None);
        let outcome = apply_discounts(d("7.5"), CouponUse::Redeem(&c), None, NOW).unwrap();
        assert_eq!(outcome.coupon_discount, d("8"));
        assert_eq!(outcome.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_redeem_runs_gate_reapply_does_not() {
        let mut c = coupon(DiscountType::Percentage, 10.0, None);
        c.used_count = 5;

        let err = apply_discounts(d("100"), CouponUse::Redeem(&c), None, NOW).unwrap_err();
        assert_eq!(
            err,
            PricingError::Policy(PolicyRejection::CouponUsageLimitReached { usage_limit: 5 })
        );

        let outcome = apply_discounts(d("100"), CouponUse::Reapply(&c), None, NOW).unwrap();
        assert_eq!(outcome.coupon_discount, d("10"));
    }

    #[test]
    fn test_min_order_checked_against_subtotal() {
        let mut c = coupon(DiscountType::Flat, 20.0, None);
        c.min_order_amount = 100.0;
        assert!(apply_discounts(d("99.99"), CouponUse::Redeem(&c), None, NOW).is_err());
        assert!(apply_discounts(d("100"), CouponUse::Redeem(&c), None, NOW).is_ok());
    }

    #[test]
    fn test_broken_coupon_terms_are_invariant() {
        let c = coupon(DiscountType::Percentage, f64::NAN, None);
        assert!(matches!(
            coupon_discount(d("100"), &c),
            Err(PricingError::Invariant(_))
        ));
    }
}
