//! Item line extraction.

use rust_decimal::Decimal;

use super::amounts::is_summary_line;
use super::lines::ReceiptLine;
use super::patterns::QUANTITY_PREFIX;
use super::{LineRule, ScanState};
use crate::models::receipt::ReceiptItem;

/// Words that mark a priced line as anything but a purchased item.
const ITEM_EXCLUSIONS: &[&str] = &["TOTAL", "TAX", "SUBTOTAL", "BALANCE", "CHANGE"];

/// Captures priced lines that are not summaries as items.
pub const ITEM_RULE: LineRule = LineRule {
    name: "item",
    applies: is_item_candidate,
    apply: apply_item,
};

pub fn is_item_candidate(line: &ReceiptLine) -> bool {
    line.price.is_some() && !is_summary_line(line) && !line.contains_any(ITEM_EXCLUSIONS)
}

fn apply_item(line: &ReceiptLine, state: &mut ScanState) {
    let ceiling = if state.total > Decimal::ZERO {
        state.total
    } else {
        state.item_price_ceiling
    };

    if let Some(item) = parse_item(line, ceiling) {
        state.items.push(item);
    }
}

/// Parse an item from a priced line.
///
/// Rejects lines with no name left after removing the price, and prices
/// that are zero or at least `ceiling` (reference numbers, balances).
pub fn parse_item(line: &ReceiptLine, ceiling: Decimal) -> Option<ReceiptItem> {
    let amount = line.price?.amount;
    let name = line.text_without_price()?;

    if name.is_empty() || amount <= Decimal::ZERO || amount >= ceiling {
        return None;
    }

    let (quantity, name) = split_quantity(&name);

    Some(ReceiptItem {
        name: name.to_string(),
        price: amount / Decimal::from(quantity),
        quantity,
    })
}

/// Split a leading "<N> x " quantity off an item name.
pub fn split_quantity(name: &str) -> (u32, &str) {
    QUANTITY_PREFIX
        .captures(name)
        .and_then(|caps| {
            let quantity = caps[1].parse::<u32>().ok().filter(|&q| q >= 1)?;
            let prefix_len = caps.get(0)?.end();
            Some((quantity, name[prefix_len..].trim()))
        })
        .unwrap_or((1, name))
}
