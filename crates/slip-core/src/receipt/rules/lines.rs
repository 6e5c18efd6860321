//! Line normalization for raw receipt text.

use rust_decimal::Decimal;

use super::amounts::parse_price;
use super::patterns::{PRICE, WHITESPACE_RUN};

/// First price found on a line and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceMatch {
    /// Parsed amount without the currency sign.
    pub amount: Decimal,
    /// Byte offset of the match start in the line text.
    pub start: usize,
    /// Byte offset of the match end in the line text.
    pub end: usize,
}

/// One normalized, non-blank receipt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Trimmed text with whitespace runs collapsed to one space.
    pub text: String,
    /// Uppercase copy used for keyword tests.
    pub upper: String,
    /// First price on the line, if any.
    pub price: Option<PriceMatch>,
}

impl ReceiptLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let upper = text.to_uppercase();
        let price = PRICE.find(&text).and_then(|m| {
            parse_price(m.as_str()).map(|amount| PriceMatch {
                amount,
                start: m.start(),
                end: m.end(),
            })
        });

        Self { text, upper, price }
    }

    /// Whether the uppercase line contains any of `keywords`.
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.upper.contains(k))
    }

    /// Number of characters in the normalized text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Line text with the first price removed, trimmed.
    pub fn text_without_price(&self) -> Option<String> {
        self.price.map(|p| {
            let mut stripped = String::with_capacity(self.text.len());
            stripped.push_str(&self.text[..p.start]);
            stripped.push_str(&self.text[p.end..]);
            stripped.trim().to_string()
        })
    }
}

/// Split text into normalized, non-blank lines.
pub fn normalize_lines(text: &str) -> Vec<ReceiptLine> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| ReceiptLine::new(WHITESPACE_RUN.replace_all(l, " ")))
        .collect()
}
