//! Delivery tier lookup
//!
//! A step function: the tier a shipment falls into prices its whole
//! weight, so 3.01 kg pays the second tier's rate on all 3.01 kg.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{DeliveryTier, Fulfillment};

use super::error::{PricingError, PricingResult};
use super::money::{checked_add, checked_mul, non_negative, round_money};

/// First tier whose bound is at or above `weight_kg`
pub fn select_tier(weight_kg: Decimal, tiers: &[DeliveryTier]) -> PricingResult<&DeliveryTier> {
    for tier in tiers {
        let Some(max) = tier.max_weight_kg else {
            return Ok(tier);
        };
        if weight_kg <= non_negative(max, "delivery tier max_weight_kg")? {
            return Ok(tier);
        }
    }
    Err(PricingError::invariant(format!(
        "no delivery tier covers {} kg",
        weight_kg.to_f64().unwrap_or_default()
    )))
}

/// Delivery charge for a shipment; pickup is always free
pub fn delivery_charge(
    weight_kg: Decimal,
    tiers: &[DeliveryTier],
    fulfillment: Fulfillment,
) -> PricingResult<Decimal> {
    if fulfillment == Fulfillment::Pickup {
        return Ok(Decimal::ZERO);
    }
    let tier = select_tier(weight_kg, tiers)?;
    let rate = non_negative(tier.rate_per_kg, "delivery rate_per_kg")?;
    let flat = non_negative(tier.flat_slip_fee, "delivery flat_slip_fee")?;
    let by_weight = checked_mul(rate, weight_kg, "delivery charge")?;
    Ok(round_money(checked_add(by_weight, flat, "delivery charge")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RateTable;

    fn kg(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_tier_cliff() {
        let tiers = RateTable::default().delivery_tiers;
        assert_eq!(
            delivery_charge(kg("3.0"), &tiers, Fulfillment::Delivery).unwrap(),
            kg("105")
        );
        // 29 × 3.01 + 20, the whole weight at the second tier's rate
        assert_eq!(
            delivery_charge(kg("3.01"), &tiers, Fulfillment::Delivery).unwrap(),
            kg("107.29")
        );
        // crossing the boundary costs more than staying under it
        assert!(
            delivery_charge(kg("3.01"), &tiers, Fulfillment::Delivery).unwrap()
                > delivery_charge(kg("3.0"), &tiers, Fulfillment::Delivery).unwrap()
        );
    }

    #[test]
    fn test_upper_tiers() {
        let tiers = RateTable::default().delivery_tiers;
        assert_eq!(
            delivery_charge(kg("10"), &tiers, Fulfillment::Delivery).unwrap(),
            kg("310")
        );
        assert_eq!(
            delivery_charge(kg("12"), &tiers, Fulfillment::Delivery).unwrap(),
            kg("332")
        );
    }

    #[test]
    fn test_pickup_is_free() {
        let tiers = RateTable::default().delivery_tiers;
        assert_eq!(
            delivery_charge(kg("25"), &tiers, Fulfillment::Pickup).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_missing_catch_all_is_invariant() {
        let mut tiers = RateTable::default().delivery_tiers;
        tiers.pop();
        let err = delivery_charge(kg("50"), &tiers, Fulfillment::Delivery).unwrap_err();
        assert!(matches!(err, PricingError::Invariant(_)));
    }

    #[test]
    fn test_select_tier() {
        let tiers = RateTable::default().delivery_tiers;
        assert_eq!(select_tier(kg("0.5"), &tiers).unwrap().rate_per_kg, 35.0);
        assert_eq!(select_tier(kg("3.05"), &tiers).unwrap().rate_per_kg, 29.0);
        assert_eq!(select_tier(kg("10.05"), &tiers).unwrap().rate_per_kg, 26.0);
    }
}
