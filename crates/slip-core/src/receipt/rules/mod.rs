//! Rule-based field extractors for receipts.
//!
//! Header fields (merchant, date) are found by [`FieldExtractor`]s that stop
//! at the first qualifying line. Monetary fields come from [`LINE_RULES`], an
//! ordered table of predicate/action pairs that is applied to every line.

pub mod amounts;
pub mod confidence;
pub mod dates;
pub mod items;
pub mod lines;
pub mod merchant;
pub mod patterns;
pub mod payment;

pub use amounts::{SUBTOTAL_RULE, TAX_RULE, TOTAL_RULE, parse_price};
pub use confidence::{ConfidenceSignals, score_confidence};
pub use dates::DateExtractor;
pub use items::ITEM_RULE;
pub use lines::{PriceMatch, ReceiptLine, normalize_lines};
pub use merchant::MerchantExtractor;
pub use payment::PAYMENT_RULE;

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::receipt::ReceiptItem;

/// Trait for header field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from the first line that qualifies.
    fn extract(&self, lines: &[ReceiptLine]) -> Option<ExtractionMatch<Self::Output>>;
}

/// A field value and the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the source line.
    pub line: usize,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize) -> Self {
        Self { value, line }
    }
}

/// Accumulated monetary fields while scanning lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    pub total: Decimal,
    pub tax: Decimal,
    pub subtotal: Decimal,
    pub items: Vec<ReceiptItem>,
    pub payment_method: String,
    /// Upper bound for item prices until a total has been seen.
    pub item_price_ceiling: Decimal,
}

impl ScanState {
    pub fn new(item_price_ceiling: Decimal) -> Self {
        Self {
            total: Decimal::ZERO,
            tax: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            items: Vec::new(),
            payment_method: String::new(),
            item_price_ceiling,
        }
    }

    /// Sum of `price * quantity` over the captured items.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(ReceiptItem::line_total).sum()
    }
}

/// A single line classification rule.
pub struct LineRule {
    /// Rule name, used in logs.
    pub name: &'static str,
    /// Whether the rule fires for a line.
    pub applies: fn(&ReceiptLine) -> bool,
    /// Effect of the rule on the scan state.
    pub apply: fn(&ReceiptLine, &mut ScanState),
}

impl LineRule {
    /// Apply the rule if its predicate holds. Returns whether it fired.
    pub fn run(&self, line: &ReceiptLine, state: &mut ScanState) -> bool {
        if (self.applies)(line) {
            (self.apply)(line, state);
            true
        } else {
            false
        }
    }
}

/// Line rules in evaluation order.
pub const LINE_RULES: [LineRule; 5] = [TOTAL_RULE, TAX_RULE, SUBTOTAL_RULE, ITEM_RULE, PAYMENT_RULE];

/// Run every rule over every line, in order.
pub fn classify_lines(lines: &[ReceiptLine], item_price_ceiling: Decimal) -> ScanState {
    lines
        .iter()
        .fold(ScanState::new(item_price_ceiling), |mut state, line| {
            for rule in &LINE_RULES {
                if rule.run(line, &mut state) {
                    trace!(rule = rule.name, line = %line.text, "rule fired");
                }
            }
            state
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_subtotal_line_feeds_total_until_overridden() {
        let lines = normalize_lines("SUBTOTAL 15.99\nTAX 1.28\nTOTAL 17.27");
        let state = classify_lines(&lines, Decimal::from(1000));

        assert_eq!(state.subtotal, dec("15.99"));
        assert_eq!(state.tax, dec("1.28"));
        assert_eq!(state.total, dec("17.27"));
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_rule_order_is_stable() {
        let names: Vec<_> = LINE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["total", "tax", "subtotal", "item", "payment"]);
    }

    #[test]
    fn test_items_keep_input_order() {
        let lines = normalize_lines("Tea 2.00\nScone 3.50\nJam 1.25");
        let state = classify_lines(&lines, Decimal::from(1000));

        let names: Vec<_> = state.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tea", "Scone", "Jam"]);
        assert_eq!(state.items_total(), dec("6.75"));
    }
}
