//! Item charges: printing and binding
//!
//! Printing follows logical page faces (after N-up), times copies. Binding
//! is a flat rate per bound unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Binding, PaperSize, PrintMode, PrintRates, PrintSelection, PrintSide, RateTable};

use super::accounting::PageAccounting;
use super::error::{PolicyRejection, PricingError, PricingResult};
use super::money::{checked_mul, non_negative, round_money, to_decimal, to_f64};

/// Most sheets a staple can hold (across all copies)
pub const STAPLE_SHEET_CAP: u64 = 50;

/// Printing and binding charges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemCharges {
    pub printing_charge: f64,
    pub binding_charge: f64,
}

/// Decimal form used while composing a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ChargeAmounts {
    pub printing: Decimal,
    pub binding: Decimal,
}

impl From<ChargeAmounts> for ItemCharges {
    fn from(amounts: ChargeAmounts) -> Self {
        Self {
            printing_charge: to_f64(amounts.printing),
            binding_charge: to_f64(amounts.binding),
        }
    }
}

/// Unit print rate for a mode/side/size combination
///
/// A3 falls back to twice the A4 rate when the table has no A3 entry.
pub fn unit_rate(
    rates: &PrintRates,
    mode: PrintMode,
    side: PrintSide,
    size: PaperSize,
) -> PricingResult<Decimal> {
    let size_rates = rates.size_rates(mode, side);
    let a4 = || -> PricingResult<Decimal> {
        let rate = size_rates.a4.ok_or_else(|| {
            PricingError::invariant(format!("no A4 print rate for {mode:?}/{side:?}"))
        })?;
        positive_rate(rate, mode, side, PaperSize::A4)
    };
    match size {
        PaperSize::A4 => a4(),
        PaperSize::A3 => match size_rates.a3 {
            Some(rate) => positive_rate(rate, mode, side, PaperSize::A3),
            None => Ok(a4()? * Decimal::TWO),
        },
    }
}

fn positive_rate(rate: f64, mode: PrintMode, side: PrintSide, size: PaperSize) -> PricingResult<Decimal> {
    let field = format!("print rate {mode:?}/{side:?}/{size:?}");
    let rate = to_decimal(rate, &field)?;
    if rate <= Decimal::ZERO {
        return Err(PricingError::invariant(format!(
            "{field} must be positive, got {rate}"
        )));
    }
    Ok(rate)
}

/// Flat rate per bound unit
fn binding_rate(rates: &RateTable, binding: Binding, size: PaperSize) -> PricingResult<Decimal> {
    match binding {
        Binding::LoosePapers => Ok(Decimal::ZERO),
        Binding::Staple => non_negative(rates.additional.staple, "staple rate"),
        Binding::Spiral => non_negative(rates.additional.spiral.for_size(size), "spiral rate"),
        Binding::Chart => non_negative(rates.additional.chart.for_size(size), "chart rate"),
    }
}

/// Staple binding is only offered up to [`STAPLE_SHEET_CAP`] sheets
pub fn check_binding_policy(
    selection: &PrintSelection,
    accounting: &PageAccounting,
) -> Result<(), PolicyRejection> {
    if selection.binding == Binding::Staple {
        let sheets = accounting.total_sheets(selection.copies);
        if sheets > STAPLE_SHEET_CAP {
            return Err(PolicyRejection::StapleSheetCapExceeded {
                sheets,
                cap: STAPLE_SHEET_CAP,
            });
        }
    }
    Ok(())
}

pub(crate) fn charge_amounts(
    selection: &PrintSelection,
    rates: &RateTable,
    accounting: &PageAccounting,
) -> PricingResult<ChargeAmounts> {
    if accounting.is_empty() {
        return Ok(ChargeAmounts::default());
    }

    let unit = unit_rate(&rates.printing, selection.mode, selection.side, selection.paper_size)?;
    let printing = checked_mul(
        checked_mul(
            Decimal::from(accounting.effective_pages_after_layout),
            unit,
            "printing charge",
        )?,
        Decimal::from(selection.copies),
        "printing charge",
    )?;

    let binding = if selection.binding.uses_quantity() {
        checked_mul(
            binding_rate(rates, selection.binding, selection.paper_size)?,
            Decimal::from(selection.binding_quantity),
            "binding charge",
        )?
    } else {
        Decimal::ZERO
    };

    Ok(ChargeAmounts {
        printing: round_money(printing),
        binding: round_money(binding),
    })
}

/// Price printing and binding for one selection
///
/// Does not apply the staple cap; see [`check_binding_policy`].
pub fn price(
    selection: &PrintSelection,
    rates: &RateTable,
    accounting: &PageAccounting,
) -> PricingResult<ItemCharges> {
    charge_amounts(selection, rates, accounting).map(ItemCharges::from)
}
