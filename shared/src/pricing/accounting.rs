//! Page accounting: document pages → billable sheets

use serde::{Deserialize, Serialize};

use crate::models::{DocumentFile, PageRangeMode, PrintSelection, PrintSide};

use super::page_range::count_pages_in_range;

/// Page and sheet counts for one pricing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageAccounting {
    /// Sum of every file's detected page count
    pub document_pages: u32,
    pub billable_pages_after_range: u32,
    /// Logical page faces after N-up folding
    pub effective_pages_after_layout: u32,
    /// Physical sheets per copy after duplex
    pub billable_sheets: u32,
}

impl PageAccounting {
    /// Nothing will be printed
    pub fn is_empty(&self) -> bool {
        self.effective_pages_after_layout == 0
    }

    /// Sheets across all copies
    pub fn total_sheets(&self, copies: u32) -> u64 {
        u64::from(self.billable_sheets) * u64::from(copies)
    }
}

/// Turn file metadata and a selection into billable counts
///
/// A custom range addresses the files as one continuous document.
pub fn count_billable_pages(files: &[DocumentFile], selection: &PrintSelection) -> PageAccounting {
    let document_pages = files
        .iter()
        .fold(0u32, |acc, f| acc.saturating_add(f.detected_page_count));

    let billable_pages_after_range = match selection.page_range_mode {
        PageRangeMode::All => document_pages,
        PageRangeMode::Custom => selection
            .custom_range_spec
            .as_deref()
            .map_or(0, |spec| count_pages_in_range(spec, document_pages)),
    };

    let effective_pages_after_layout = if selection.pages_per_sheet == 2 {
        billable_pages_after_range.div_ceil(2)
    } else {
        billable_pages_after_range
    };

    let billable_sheets = match selection.side {
        PrintSide::Double => effective_pages_after_layout.div_ceil(2),
        PrintSide::Single => effective_pages_after_layout,
    };

    PageAccounting {
        document_pages,
        billable_pages_after_range,
        effective_pages_after_layout,
        billable_sheets,
    }
}
