//! Date detection for receipts.

use super::lines::ReceiptLine;
use super::patterns::date_patterns;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Lines are scanned in order and each line is tried against the patterns
/// `MM/DD/YYYY`, `MM-DD-YYYY`, `YYYY-MM-DD`, `MM.DD.YYYY` in that order. The
/// raw token is kept as written on the receipt.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, lines: &[ReceiptLine]) -> Option<ExtractionMatch<String>> {
        lines.iter().enumerate().find_map(|(idx, line)| {
            date_patterns()
                .iter()
                .find_map(|re| re.captures(&line.text).and_then(|caps| caps.get(1)))
                .map(|m| ExtractionMatch::new(m.as_str().to_string(), idx))
        })
    }
}
