//! Price Breakdown Model

use serde::{Deserialize, Serialize};

/// Authoritative pricing result, stored verbatim on the order
///
/// `subtotal = printing + binding + delivery` and
/// `total = max(0, subtotal - couponDiscount - walletUsed)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub printing_charge: f64,
    pub binding_charge: f64,
    pub delivery_charge: f64,
    pub subtotal: f64,
    pub coupon_discount: f64,
    pub wallet_used: f64,
    pub total_amount: f64,
    pub weight_kg: f64,
}
