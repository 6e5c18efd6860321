//! Receipt data model produced by the parser.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant name used when no header line qualifies.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Structured data extracted from one receipt.
///
/// Money fields are never negative. When no explicit total or subtotal line
/// is found they are backfilled from the line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    /// Business name, or [`UNKNOWN_MERCHANT`].
    pub merchant: String,

    /// Raw date token from the receipt, or today's date as `YYYY-MM-DD`.
    pub date: String,

    /// Final amount charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Purchased items in input order.
    pub items: Vec<ReceiptItem>,

    /// Tax amount, zero when not detected.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Subtotal before tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Full text of the line naming the payment method, empty if none.
    pub payment_method: String,

    /// Heuristic extraction quality (0.0 - 1.0).
    pub confidence: f32,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item description with price and quantity prefix removed.
    pub name: String,

    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Number of units, at least 1.
    pub quantity: u32,
}

impl ReceiptItem {
    /// Price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl ExtractedData {
    /// Sum of `price * quantity` over all items.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(ReceiptItem::line_total).sum()
    }

    /// Whether the merchant line was recognized.
    pub fn has_merchant(&self) -> bool {
        self.merchant != UNKNOWN_MERCHANT
    }

    /// True when confidence falls below `threshold` and a person should
    /// confirm the fields before they are saved.
    pub fn needs_review(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }

    /// Validate the extracted data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.has_merchant() {
            issues.push("Merchant could not be identified".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.total.is_zero() {
            issues.push("Total is zero".to_string());
        }

        let expected = self.subtotal + self.tax;
        if !self.total.is_zero() && (self.total - expected).abs() >= Decimal::new(1, 2) {
            issues.push(format!(
                "Total ({}) differs from subtotal plus tax ({})",
                self.total, expected
            ));
        }

        issues
    }
}
