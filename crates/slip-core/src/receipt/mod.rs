//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, ReceiptParser, parse_receipt};

use crate::error::ReceiptError;
use crate::models::receipt::ExtractedData;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Trait for receipt extractors.
pub trait ReceiptExtractor {
    /// Extract receipt data from plain text.
    fn extract_from_text(&self, text: &str) -> Result<ExtractedData>;
}
