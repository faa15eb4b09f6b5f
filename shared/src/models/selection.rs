//! Print Selection Model
//!
//! What the customer picked in the print wizard. Immutable for one pricing
//! run; wire names match the browser form (`BW`, `Double`, `Loose Papers`).

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::pricing::error::{PricingError, PricingResult};
use crate::pricing::page_range::validate_page_range;

/// Upper bound on copies per order
pub const MAX_COPIES: u32 = 10_000;
/// Upper bound on bound units per order
pub const MAX_BINDING_QUANTITY: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintMode {
    #[serde(rename = "BW", alias = "bw", alias = "B/W")]
    Bw,
    #[serde(alias = "color", alias = "Colour")]
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintSide {
    #[serde(alias = "single")]
    Single,
    #[serde(alias = "double")]
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    #[serde(alias = "a4")]
    A4,
    #[serde(alias = "a3")]
    A3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Binding {
    #[default]
    #[serde(rename = "Loose Papers", alias = "None", alias = "none")]
    LoosePapers,
    Staple,
    Spiral,
    Chart,
}

impl Binding {
    /// Bindings billed per bound unit
    pub fn uses_quantity(&self) -> bool {
        !matches!(self, Self::LoosePapers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PageRangeMode {
    #[default]
    All,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Fulfillment {
    Delivery,
    #[default]
    Pickup,
}

fn default_one() -> u32 {
    1
}

fn default_pages_per_sheet() -> u8 {
    1
}

/// Print selection (one pricing run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSelection {
    pub mode: PrintMode,
    pub side: PrintSide,
    pub paper_size: PaperSize,
    pub copies: u32,
    #[serde(default)]
    pub binding: Binding,
    #[serde(default = "default_one")]
    pub binding_quantity: u32,
    #[serde(default)]
    pub page_range_mode: PageRangeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_range_spec: Option<String>,
    #[serde(default = "default_pages_per_sheet")]
    pub pages_per_sheet: u8,
    #[serde(default)]
    pub fulfillment: Fulfillment,
}

impl Default for PrintSelection {
    /// One black-and-white single-sided A4 copy, loose, picked up
    fn default() -> Self {
        Self {
            mode: PrintMode::Bw,
            side: PrintSide::Single,
            paper_size: PaperSize::A4,
            copies: 1,
            binding: Binding::LoosePapers,
            binding_quantity: 1,
            page_range_mode: PageRangeMode::All,
            custom_range_spec: None,
            pages_per_sheet: 1,
            fulfillment: Fulfillment::Pickup,
        }
    }
}

impl PrintSelection {
    /// Reject selections no calculator run should see
    pub fn validate(&self) -> PricingResult<()> {
        if self.copies == 0 || self.copies > MAX_COPIES {
            return Err(PricingError::invalid_selection(format!(
                "copies must be between 1 and {}, got {}",
                MAX_COPIES, self.copies
            )));
        }
        if self.binding_quantity == 0 || self.binding_quantity > MAX_BINDING_QUANTITY {
            return Err(PricingError::invalid_selection(format!(
                "bindingQuantity must be between 1 and {}, got {}",
                MAX_BINDING_QUANTITY, self.binding_quantity
            )));
        }
        if !matches!(self.pages_per_sheet, 1 | 2) {
            return Err(PricingError::invalid_selection(format!(
                "pagesPerSheet must be 1 or 2, got {}",
                self.pages_per_sheet
            )));
        }
        if self.page_range_mode == PageRangeMode::Custom {
            let spec = self.custom_range_spec.as_deref().unwrap_or_default();
            if spec.trim().is_empty() {
                return Err(PricingError::validation(
                    ErrorCode::InvalidPageRange,
                    "customRangeSpec is required when pageRangeMode is Custom",
                ));
            }
            validate_page_range(spec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selection() -> PrintSelection {
        PrintSelection {
            mode: PrintMode::Bw,
            side: PrintSide::Single,
            paper_size: PaperSize::A4,
            copies: 1,
            binding: Binding::LoosePapers,
            binding_quantity: 1,
            page_range_mode: PageRangeMode::All,
            custom_range_spec: None,
            pages_per_sheet: 1,
            fulfillment: Fulfillment::Pickup,
        }
    }

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(selection()).unwrap();
        assert_eq!(
            value,
            json!({
                "mode": "BW",
                "side": "Single",
                "paperSize": "A4",
                "copies": 1,
                "binding": "Loose Papers",
                "bindingQuantity": 1,
                "pageRangeMode": "All",
                "pagesPerSheet": 1,
                "fulfillment": "Pickup"
            })
        );
    }

    #[test]
    fn test_defaults_and_aliases() {
        let parsed: PrintSelection = serde_json::from_value(json!({
            "mode": "Color",
            "side": "Double",
            "paperSize": "A3",
            "copies": 2,
            "binding": "None"
        }))
        .unwrap();
        assert_eq!(parsed.binding, Binding::LoosePapers);
        assert_eq!(parsed.binding_quantity, 1);
        assert_eq!(parsed.pages_per_sheet, 1);
        assert_eq!(parsed.page_range_mode, PageRangeMode::All);
        assert_eq!(parsed.fulfillment, Fulfillment::Pickup);
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let parsed = serde_json::from_value::<PrintSelection>(json!({
            "mode": "BW",
            "side": "Single",
            "copies": 1
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(selection().validate().is_ok());

        let mut s = selection();
        s.copies = 0;
        assert_eq!(s.validate().unwrap_err().code(), ErrorCode::InvalidSelection);

        let mut s = selection();
        s.pages_per_sheet = 4;
        assert_eq!(s.validate().unwrap_err().code(), ErrorCode::InvalidSelection);

        let mut s = selection();
        s.binding_quantity = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_custom_range() {
        let mut s = selection();
        s.page_range_mode = PageRangeMode::Custom;
        assert_eq!(s.validate().unwrap_err().code(), ErrorCode::InvalidPageRange);

        s.custom_range_spec = Some("1-3, x".to_string());
        assert_eq!(s.validate().unwrap_err().code(), ErrorCode::InvalidPageRange);

        s.custom_range_spec = Some("1-3, 7".to_string());
        assert!(s.validate().is_ok());
    }
}
