//! Full order pricing
//!
//! Accounting → charges → weight → delivery → discounts, against one rate
//! table snapshot. The browser estimate and the server reconciliation both
//! call [`price_order`]; given the same input they produce the same
//! breakdown.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{DocumentFile, PriceBreakdown, PrintSelection, RateTable};
use crate::types::Timestamp;

use super::accounting::{PageAccounting, count_billable_pages};
use super::charges::{charge_amounts, check_binding_policy};
use super::delivery::delivery_charge;
use super::discount::{CouponUse, apply_discounts};
use super::error::PricingResult;
use super::money::{checked_add, non_negative, round_money, to_f64};
use super::weight::estimate_weight_kg;

/// Everything one pricing run reads
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub selection: &'a PrintSelection,
    pub files: &'a [DocumentFile],
    pub rates: &'a RateTable,
    pub coupon: CouponUse<'a>,
    /// Spendable wallet funds; `None` when the wallet is not used
    pub wallet_balance: Option<f64>,
    pub now: Timestamp,
}

/// Breakdown plus the page counts it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub accounting: PageAccounting,
    pub breakdown: PriceBreakdown,
}

/// Price an order and keep the page accounting
pub fn quote(input: &PricingInput<'_>) -> PricingResult<Quote> {
    let selection = input.selection;
    selection.validate()?;

    let accounting = count_billable_pages(input.files, selection);
    if accounting.is_empty() {
        return Ok(Quote {
            accounting,
            breakdown: PriceBreakdown::default(),
        });
    }

    check_binding_policy(selection, &accounting)?;
    let charges = charge_amounts(selection, input.rates, &accounting)?;

    let weight = estimate_weight_kg(
        accounting.billable_sheets,
        selection.copies,
        selection.binding,
        selection.binding_quantity,
    );
    let delivery = delivery_charge(weight, &input.rates.delivery_tiers, selection.fulfillment)?;

    let subtotal = checked_add(charges.printing, charges.binding, "subtotal")
        .and_then(|sum| checked_add(sum, delivery, "subtotal"))
        .map(round_money)?;
    let wallet_balance = input
        .wallet_balance
        .map(|balance| non_negative(balance, "wallet balance"))
        .transpose()?;
    let discounts = apply_discounts(subtotal, input.coupon, wallet_balance, input.now)?;

    Ok(Quote {
        accounting,
        breakdown: PriceBreakdown {
            printing_charge: to_f64(charges.printing),
            binding_charge: to_f64(charges.binding),
            delivery_charge: to_f64(delivery),
            subtotal: to_f64(subtotal),
            coupon_discount: to_f64(discounts.coupon_discount),
            wallet_used: to_f64(discounts.wallet_used),
            total_amount: to_f64(discounts.total_amount.max(Decimal::ZERO)),
            weight_kg: to_f64(weight),
        },
    })
}

/// Authoritative price of an order
pub fn price_order(input: &PricingInput<'_>) -> PricingResult<PriceBreakdown> {
    quote(input).map(|q| q.breakdown)
}
