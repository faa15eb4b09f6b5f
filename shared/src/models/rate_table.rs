//! Rate Table Model
//!
//! Versioned pricing configuration. Field names are the ones the browser
//! mirror reads from `GET /pricing` (`printing`, `additional`,
//! `delivery_tiers`), so they stay snake_case.

use serde::{Deserialize, Serialize};

use super::selection::{PaperSize, PrintMode, PrintSide};

/// Per-size unit rates for one mode/side combination
///
/// `a3` may be absent; pricing then falls back to `2 × a4`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SizeRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a4: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a3: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SideRates {
    pub single: SizeRates,
    pub double: SizeRates,
}

/// Unit print rates: mode → side → size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PrintRates {
    pub bw: SideRates,
    pub color: SideRates,
}

impl PrintRates {
    pub fn size_rates(&self, mode: PrintMode, side: PrintSide) -> &SizeRates {
        let side_rates = match mode {
            PrintMode::Bw => &self.bw,
            PrintMode::Color => &self.color,
        };
        match side {
            PrintSide::Single => &side_rates.single,
            PrintSide::Double => &side_rates.double,
        }
    }
}

/// Flat binding rate per bound unit, by paper size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BindingRates {
    pub a4: f64,
    pub a3: f64,
}

impl BindingRates {
    pub fn for_size(&self, size: PaperSize) -> f64 {
        match size {
            PaperSize::A4 => self.a4,
            PaperSize::A3 => self.a3,
        }
    }
}

/// Largest rate, fee or tier bound a table may carry
pub const MAX_RATE: f64 = 1_000_000.0;

/// Binding surcharges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AdditionalRates {
    pub spiral: BindingRates,
    pub chart: BindingRates,
    /// Per stapled set; free unless configured
    #[serde(default)]
    pub staple: f64,
}

/// One delivery weight band
///
/// `max_weight_kg: None` is the unbounded catch-all and must be last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTier {
    pub max_weight_kg: Option<f64>,
    pub rate_per_kg: f64,
    #[serde(default)]
    pub flat_slip_fee: f64,
}

/// Rate table entity (one live record, replaced wholesale by staff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub updated_at: i64,
    pub printing: PrintRates,
    pub additional: AdditionalRates,
    pub delivery_tiers: Vec<DeliveryTier>,
}

/// Replace rate table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableUpdate {
    pub printing: PrintRates,
    pub additional: AdditionalRates,
    pub delivery_tiers: Vec<DeliveryTier>,
}

impl RateTableUpdate {
    pub fn into_table(self, version: u64, updated_at: i64) -> RateTable {
        RateTable {
            version,
            updated_at,
            printing: self.printing,
            additional: self.additional,
            delivery_tiers: self.delivery_tiers,
        }
    }
}

impl RateTable {
    /// Check the table is usable for pricing
    ///
    /// Every A4 print rate present and positive, every A3 override (if any)
    /// positive, binding rates non-negative, delivery tiers ascending with
    /// exactly the last one unbounded. Nothing may exceed [`MAX_RATE`].
    pub fn validate(&self) -> Result<(), String> {
        self.check_ceiling()?;
        for mode in [PrintMode::Bw, PrintMode::Color] {
            for side in [PrintSide::Single, PrintSide::Double] {
                let rates = self.printing.size_rates(mode, side);
                match rates.a4 {
                    Some(rate) if rate.is_finite() && rate > 0.0 => {}
                    Some(rate) => {
                        return Err(format!(
                            "printing rate {mode:?}/{side:?}/A4 must be positive, got {rate}"
                        ));
                    }
                    None => return Err(format!("printing rate {mode:?}/{side:?}/A4 is missing")),
                }
                if let Some(rate) = rates.a3.filter(|r| !(r.is_finite() && *r > 0.0)) {
                    return Err(format!(
                        "printing rate {mode:?}/{side:?}/A3 must be positive, got {rate}"
                    ));
                }
            }
        }

        let binding = [
            ("spiral/A4", self.additional.spiral.a4),
            ("spiral/A3", self.additional.spiral.a3),
            ("chart/A4", self.additional.chart.a4),
            ("chart/A3", self.additional.chart.a3),
            ("staple", self.additional.staple),
        ];
        for (name, rate) in binding {
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("binding rate {name} must be non-negative, got {rate}"));
            }
        }

        let Some((last, bounded)) = self.delivery_tiers.split_last() else {
            return Err("at least one delivery tier is required".to_string());
        };
        if last.max_weight_kg.is_some() {
            return Err("the last delivery tier must be unbounded".to_string());
        }
        let mut previous = 0.0_f64;
        for (i, tier) in bounded.iter().enumerate() {
            let Some(max) = tier.max_weight_kg else {
                return Err(format!("delivery tier {i} is unbounded but not last"));
            };
            if !max.is_finite() || max < 0.0 || (i > 0 && max <= previous) {
                return Err(format!(
                    "delivery tier {i} max_weight_kg must ascend, got {max}"
                ));
            }
            previous = max;
        }
        for (i, tier) in self.delivery_tiers.iter().enumerate() {
            if !tier.rate_per_kg.is_finite() || tier.rate_per_kg < 0.0 {
                return Err(format!(
                    "delivery tier {i} rate_per_kg must be non-negative, got {}",
                    tier.rate_per_kg
                ));
            }
            if !tier.flat_slip_fee.is_finite() || tier.flat_slip_fee < 0.0 {
                return Err(format!(
                    "delivery tier {i} flat_slip_fee must be non-negative, got {}",
                    tier.flat_slip_fee
                ));
            }
        }
        Ok(())
    }

    fn check_ceiling(&self) -> Result<(), String> {
        let mut values = Vec::new();
        for mode in [PrintMode::Bw, PrintMode::Color] {
            for side in [PrintSide::Single, PrintSide::Double] {
                let rates = self.printing.size_rates(mode, side);
                for (size, rate) in [("A4", rates.a4), ("A3", rates.a3)] {
                    if let Some(rate) = rate {
                        values.push((format!("printing rate {mode:?}/{side:?}/{size}"), rate));
                    }
                }
            }
        }
        values.push(("binding rate spiral/A4".to_string(), self.additional.spiral.a4));
        values.push(("binding rate spiral/A3".to_string(), self.additional.spiral.a3));
        values.push(("binding rate chart/A4".to_string(), self.additional.chart.a4));
        values.push(("binding rate chart/A3".to_string(), self.additional.chart.a3));
        values.push(("binding rate staple".to_string(), self.additional.staple));
        for (i, tier) in self.delivery_tiers.iter().enumerate() {
            if let Some(max) = tier.max_weight_kg {
                values.push((format!("delivery tier {i} max_weight_kg"), max));
            }
            values.push((format!("delivery tier {i} rate_per_kg"), tier.rate_per_kg));
            values.push((format!("delivery tier {i} flat_slip_fee"), tier.flat_slip_fee));
        }

        match values.into_iter().find(|(_, value)| *value > MAX_RATE) {
            Some((name, value)) => Err(format!("{name} must be at most {MAX_RATE}, got {value}")),
            None => Ok(()),
        }
    }
}

impl Default for RateTable {
    /// Reference tariff: `{≤3kg: 35/kg+0, ≤10kg: 29/kg+20, else: 26/kg+20}`
    fn default() -> Self {
        let rates = |single_a4: f64, double_a4: f64| SideRates {
            single: SizeRates {
                a4: Some(single_a4),
                a3: None,
            },
            double: SizeRates {
                a4: Some(double_a4),
                a3: None,
            },
        };
        Self {
            version: 1,
            updated_at: 0,
            printing: PrintRates {
                bw: rates(0.75, 0.6),
                color: rates(5.0, 4.5),
            },
            additional: AdditionalRates {
                spiral: BindingRates { a4: 30.0, a3: 50.0 },
                chart: BindingRates { a4: 20.0, a3: 35.0 },
                staple: 0.0,
            },
            delivery_tiers: vec![
                DeliveryTier {
                    max_weight_kg: Some(3.0),
                    rate_per_kg: 35.0,
                    flat_slip_fee: 0.0,
                },
                DeliveryTier {
                    max_weight_kg: Some(10.0),
                    rate_per_kg: 29.0,
                    flat_slip_fee: 20.0,
                },
                DeliveryTier {
                    max_weight_kg: None,
                    rate_per_kg: 26.0,
                    flat_slip_fee: 20.0,
                },
            ],
        }
    }
}
