//! Receipt parsing results
//!
//! Transient values produced when pasted receipt text is split into items.

use super::money::Money;

/// One recognised item line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// The line as it appeared (trimmed)
    pub raw: String,
    pub description: String,
    pub amount: Money,
    pub quantity: u32,
}

impl ReceiptLine {
    pub fn new(raw: impl Into<String>, description: impl Into<String>, amount: Money) -> Self {
        Self {
            raw: raw.into(),
            description: description.into(),
            amount,
            quantity: 1,
        }
    }
}

/// Everything extracted from a receipt body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptParseResult {
    pub original_text: String,
    pub lines: Vec<ReceiptLine>,
    /// Total printed on the receipt, if any; informational only
    pub total_detected: Option<Money>,
    pub warnings: Vec<String>,
}

impl ReceiptParseResult {
    /// Sum of the parsed item amounts
    pub fn items_total(&self) -> Money {
        self.lines.iter().map(|line| line.amount).sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
