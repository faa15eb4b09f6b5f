//! Print order pricing
//!
//! Pure functions over `rust_decimal::Decimal`; amounts leave this module as
//! `f64` rounded to 2 places. No I/O and no clock reads: a pricing run sees
//! exactly one rate table snapshot and one `now`.
//!
//! - [`accounting`]: document pages → billable sheets
//! - [`charges`]: printing and binding
//! - [`weight`] / [`delivery`]: shipping weight and tier charge
//! - [`discount`]: coupon, then wallet
//! - [`estimate`]: the composition of all of the above

pub mod accounting;
pub mod charges;
pub mod delivery;
pub mod discount;
pub mod error;
pub mod estimate;
pub mod money;
pub mod page_range;
pub mod weight;

pub use accounting::{PageAccounting, count_billable_pages};
pub use charges::{ItemCharges, STAPLE_SHEET_CAP, check_binding_policy, price, unit_rate};
pub use delivery::delivery_charge;
pub use discount::{CouponUse, DiscountOutcome, apply_discounts, coupon_discount};
pub use error::{PolicyRejection, PricingError, PricingResult};
pub use estimate::{PricingInput, Quote, price_order, quote};
pub use page_range::{count_pages_in_range, validate_page_range};
pub use weight::estimate_weight_kg;
