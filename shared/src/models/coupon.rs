//! Coupon Model

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::pricing::error::{PolicyRejection, PricingError, PricingResult};
use crate::types::Timestamp;

/// Longest accepted coupon code
pub const MAX_COUPON_CODE_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    #[serde(alias = "fixed")]
    Flat,
}

fn default_true() -> bool {
    true
}

/// Coupon entity
///
/// `used_count` only ever grows, once per placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    /// Percentage: 20 = 20%; flat: currency amount
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: f64,
    /// Cap for percentage coupons (None = uncapped)
    #[serde(default)]
    pub max_discount_amount: Option<f64>,
    /// None = unlimited
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    /// Valid from (Unix millis, inclusive)
    #[serde(default)]
    pub valid_from: Option<Timestamp>,
    /// Valid until (Unix millis, inclusive)
    #[serde(default)]
    pub valid_till: Option<Timestamp>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Create/replace coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponUpsert {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: f64,
    #[serde(default)]
    pub max_discount_amount: Option<f64>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub valid_from: Option<Timestamp>,
    #[serde(default)]
    pub valid_till: Option<Timestamp>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Coupon {
    /// Upper-case and syntax-check a customer-typed code
    pub fn normalize_code(raw: &str) -> PricingResult<String> {
        let code = raw.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(PricingError::validation(
                ErrorCode::CouponMalformed,
                "coupon code is empty",
            ));
        }
        if code.len() > MAX_COUPON_CODE_LEN {
            return Err(PricingError::validation(
                ErrorCode::CouponMalformed,
                format!("coupon code is longer than {MAX_COUPON_CODE_LEN} characters"),
            ));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PricingError::validation(
                ErrorCode::CouponMalformed,
                format!("coupon code '{}' contains invalid characters", raw.trim()),
            ));
        }
        Ok(code)
    }

    /// Build a coupon from a staff payload, keeping an existing usage count
    pub fn from_upsert(upsert: CouponUpsert, used_count: u32) -> PricingResult<Self> {
        let coupon = Self {
            code: Self::normalize_code(&upsert.code)?,
            discount_type: upsert.discount_type,
            discount_value: upsert.discount_value,
            min_order_amount: upsert.min_order_amount,
            max_discount_amount: upsert.max_discount_amount,
            usage_limit: upsert.usage_limit,
            used_count,
            valid_from: upsert.valid_from,
            valid_till: upsert.valid_till,
            is_active: upsert.is_active,
        };
        coupon.validate_terms()?;
        Ok(coupon)
    }

    /// Numeric terms must be finite and non-negative; percentages at most 100
    pub fn validate_terms(&self) -> PricingResult<()> {
        let invalid =
            |message: String| PricingError::validation(ErrorCode::CouponInvalidTerms, message);
        let mut amounts = vec![
            ("discountValue", self.discount_value),
            ("minOrderAmount", self.min_order_amount),
        ];
        if let Some(cap) = self.max_discount_amount {
            amounts.push(("maxDiscountAmount", cap));
        }
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100.0 {
            return Err(invalid(format!(
                "percentage discount must be at most 100, got {}",
                self.discount_value
            )));
        }
        if let (Some(from), Some(till)) = (self.valid_from, self.valid_till) {
            if from > till {
                return Err(invalid(format!("validFrom {from} is after validTill {till}")));
            }
        }
        Ok(())
    }

    /// Whether another redemption fits under the usage limit
    pub fn has_remaining_uses(&self) -> bool {
        self.usage_limit.is_none_or(|limit| self.used_count < limit)
    }

    /// Validity gate, checked before any discount is applied
    pub fn check_redeemable(&self, subtotal: f64, now: Timestamp) -> Result<(), PolicyRejection> {
        if !self.is_active {
            return Err(PolicyRejection::CouponInactive);
        }
        if let Some(valid_from) = self.valid_from.filter(|from| now < *from) {
            return Err(PolicyRejection::CouponNotYetValid { valid_from });
        }
        if let Some(valid_till) = self.valid_till.filter(|till| now > *till) {
            return Err(PolicyRejection::CouponExpired { valid_till });
        }
        if let Some(usage_limit) = self.usage_limit.filter(|_| !self.has_remaining_uses()) {
            return Err(PolicyRejection::CouponUsageLimitReached { usage_limit });
        }
        if subtotal < self.min_order_amount {
            return Err(PolicyRejection::CouponMinOrderNotMet {
                subtotal,
                min_order_amount: self.min_order_amount,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_768_471_200_000;

    fn coupon() -> Coupon {
        Coupon {
            code: "SAVE20".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 20.0,
            min_order_amount: 100.0,
            max_discount_amount: Some(80.0),
            usage_limit: Some(10),
            used_count: 0,
            valid_from: Some(NOW - 1_000),
            valid_till: Some(NOW + 1_000),
            is_active: true,
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(Coupon::normalize_code(" save20 ").unwrap(), "SAVE20");
        assert_eq!(Coupon::normalize_code("new-year_26").unwrap(), "NEW-YEAR_26");
        for bad in ["", "   ", "SAVE 20", "50%OFF"] {
            let err = Coupon::normalize_code(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::CouponMalformed, "{bad:?}");
        }
        assert!(Coupon::normalize_code(&"A".repeat(33)).is_err());
        assert!(Coupon::normalize_code(&"A".repeat(32)).is_ok());
    }

    #[test]
    fn test_gate_accepts_valid_coupon() {
        assert_eq!(coupon().check_redeemable(500.0, NOW), Ok(()));
        // window bounds are inclusive
        assert_eq!(coupon().check_redeemable(500.0, NOW + 1_000), Ok(()));
        assert_eq!(coupon().check_redeemable(500.0, NOW - 1_000), Ok(()));
    }

    #[test]
    fn test_gate_reasons() {
        let mut c = coupon();
        c.is_active = false;
        assert_eq!(
            c.check_redeemable(500.0, NOW),
            Err(PolicyRejection::CouponInactive)
        );

        assert!(matches!(
            coupon().check_redeemable(500.0, NOW - 1_001),
            Err(PolicyRejection::CouponNotYetValid { .. })
        ));
        assert!(matches!(
            coupon().check_redeemable(500.0, NOW + 1_001),
            Err(PolicyRejection::CouponExpired { .. })
        ));

        let mut c = coupon();
        c.used_count = 10;
        assert_eq!(
            c.check_redeemable(500.0, NOW),
            Err(PolicyRejection::CouponUsageLimitReached { usage_limit: 10 })
        );

        assert!(matches!(
            coupon().check_redeemable(99.99, NOW),
            Err(PolicyRejection::CouponMinOrderNotMet { .. })
        ));
    }

    #[test]
    fn test_unlimited_coupon() {
        let mut c = coupon();
        c.usage_limit = None;
        c.used_count = 1_000_000;
        assert!(c.has_remaining_uses());
        assert_eq!(c.check_redeemable(500.0, NOW), Ok(()));
    }

    #[test]
    fn test_validate_terms() {
        assert!(coupon().validate_terms().is_ok());

        let mut c = coupon();
        c.discount_value = 120.0;
        assert_eq!(
            c.validate_terms().unwrap_err().code(),
            ErrorCode::CouponInvalidTerms
        );

        let mut c = coupon();
        c.max_discount_amount = Some(f64::NAN);
        assert!(c.validate_terms().is_err());

        let mut c = coupon();
        c.valid_from = Some(NOW + 5_000);
        assert!(c.validate_terms().is_err());

        let mut c = coupon();
        c.discount_type = DiscountType::Flat;
        c.discount_value = 150.0;
        assert!(c.validate_terms().is_ok());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(coupon()).unwrap();
        assert_eq!(json["discountType"], "percentage");
        assert_eq!(json["maxDiscountAmount"], 80.0);
        assert_eq!(json["isActive"], true);

        let parsed: Coupon = serde_json::from_str(
            r#"{"code":"FLAT50","discountType":"flat","discountValue":50}"#,
        )
        .unwrap();
        assert!(parsed.is_active);
        assert_eq!(parsed.usage_limit, None);
        assert_eq!(parsed.used_count, 0);
    }
}
