//! Merchant name detection.

use super::lines::ReceiptLine;
use super::{ExtractionMatch, FieldExtractor};

/// Header lines starting with these words are never the merchant name.
const RESERVED_PREFIXES: &[&str] = &["TOTAL", "AMOUNT", "DATE", "RECEIPT", "THANK", "WELCOME"];

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 50;

/// Picks the merchant from the first few lines of a receipt.
pub struct MerchantExtractor {
    scan_lines: usize,
}

impl MerchantExtractor {
    pub fn new() -> Self {
        Self { scan_lines: 3 }
    }

    /// Set how many leading lines are considered.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }
}

impl Default for MerchantExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MerchantExtractor {
    type Output = String;

    fn extract(&self, lines: &[ReceiptLine]) -> Option<ExtractionMatch<String>> {
        lines
            .iter()
            .take(self.scan_lines)
            .position(is_merchant_candidate)
            .map(|idx| ExtractionMatch::new(lines[idx].text.clone(), idx))
    }
}

/// Length strictly between 3 and 50 characters, no reserved leading word.
pub fn is_merchant_candidate(line: &ReceiptLine) -> bool {
    let len = line.char_len();
    len > MIN_NAME_LEN
        && len < MAX_NAME_LEN
        && !RESERVED_PREFIXES.iter().any(|p| line.upper.starts_with(p))
}
