//! Price parsing and summary lines (total, tax, subtotal).

use rust_decimal::Decimal;
use std::str::FromStr;

use super::lines::ReceiptLine;
use super::{LineRule, ScanState};

const TOTAL_KEYWORDS: &[&str] = &["TOTAL", "AMOUNT"];
const TAX_KEYWORDS: &[&str] = &["TAX", "VAT"];
const SUBTOTAL_KEYWORDS: &[&str] = &["SUBTOTAL"];

/// Sets `total` from lines mentioning TOTAL or AMOUNT.
pub const TOTAL_RULE: LineRule = LineRule {
    name: "total",
    applies: is_total_line,
    apply: apply_total,
};

/// Sets `tax` from lines mentioning TAX or VAT.
pub const TAX_RULE: LineRule = LineRule {
    name: "tax",
    applies: is_tax_line,
    apply: apply_tax,
};

/// Sets `subtotal` from lines mentioning SUBTOTAL.
pub const SUBTOTAL_RULE: LineRule = LineRule {
    name: "subtotal",
    applies: is_subtotal_line,
    apply: apply_subtotal,
};

pub fn is_total_line(line: &ReceiptLine) -> bool {
    line.price.is_some() && line.contains_any(TOTAL_KEYWORDS)
}

pub fn is_tax_line(line: &ReceiptLine) -> bool {
    line.price.is_some() && line.contains_any(TAX_KEYWORDS)
}

pub fn is_subtotal_line(line: &ReceiptLine) -> bool {
    line.price.is_some() && line.contains_any(SUBTOTAL_KEYWORDS)
}

/// Whether a priced line is a summary line rather than an item.
pub fn is_summary_line(line: &ReceiptLine) -> bool {
    is_total_line(line) || is_tax_line(line) || is_subtotal_line(line)
}

fn apply_total(line: &ReceiptLine, state: &mut ScanState) {
    set_positive(line, &mut state.total);
}

fn apply_tax(line: &ReceiptLine, state: &mut ScanState) {
    set_positive(line, &mut state.tax);
}

fn apply_subtotal(line: &ReceiptLine, state: &mut ScanState) {
    set_positive(line, &mut state.subtotal);
}

// Zero amounts never overwrite a field.
fn set_positive(line: &ReceiptLine, field: &mut Decimal) {
    if let Some(price) = line.price {
        if price.amount > Decimal::ZERO {
            *field = price.amount;
        }
    }
}

/// Parse a matched price such as "8.99" or "$42.00".
pub fn parse_price(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim().trim_start_matches('$')).ok()
}

/// Format an amount with two decimals.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
