//! Shipping weight estimate
//!
//! One formula for every caller: a kilogram per started 200 physical sheets,
//! plus a fixed weight per spiral or chart binding.

use rust_decimal::Decimal;

use crate::models::Binding;

/// Physical sheets per kilogram of paper
pub const SHEETS_PER_KG: u64 = 200;

/// Weight of one spiral binding (0.1 kg)
pub const SPIRAL_UNIT_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Weight of one chart binding (0.05 kg)
pub const CHART_UNIT_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Estimated shipment weight in kilograms
pub fn estimate_weight_kg(
    billable_sheets: u32,
    copies: u32,
    binding: Binding,
    binding_quantity: u32,
) -> Decimal {
    let physical_sheets = u64::from(billable_sheets) * u64::from(copies);
    let paper = Decimal::from(physical_sheets.div_ceil(SHEETS_PER_KG));
    let per_unit = match binding {
        Binding::Spiral => SPIRAL_UNIT_KG,
        Binding::Chart => CHART_UNIT_KG,
        Binding::Staple | Binding::LoosePapers => Decimal::ZERO,
    };
    paper + per_unit * Decimal::from(binding_quantity)
}
