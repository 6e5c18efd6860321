//! Heuristic receipt parser.

use std::path::Path;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::ReceiptError;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ExtractedData, UNKNOWN_MERCHANT};

use super::rules::{
    ConfidenceSignals, DateExtractor, FieldExtractor, MerchantExtractor, classify_lines,
    normalize_lines, score_confidence,
};
use super::{ReceiptExtractor, Result};

/// Parse receipt text with default settings and the local date as "today".
pub fn parse_receipt(text: &str) -> Result<ExtractedData> {
    ReceiptParser::new().parse(text)
}

/// Result of receipt extraction with diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub data: ExtractedData,
    /// Normalized lines the rules were applied to.
    pub lines: Vec<String>,
    /// Index of the line the merchant was taken from.
    pub merchant_line: Option<usize>,
    /// Index of the line the date was taken from.
    pub date_line: Option<usize>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Line-oriented receipt parser.
///
/// Parsing is a pure function of the input text and the parser settings.
/// The only ambient input is "today", used when no date is printed; pin it
/// with [`ReceiptParser::with_reference_date`] for reproducible output.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    /// Leading lines searched for the merchant name.
    merchant_scan_lines: usize,
    /// Item price ceiling used until a total is seen.
    item_price_ceiling: Decimal,
    /// Date reported when the receipt has none.
    reference_date: Option<NaiveDate>,
}

impl ReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            merchant_scan_lines: config.merchant_scan_lines,
            item_price_ceiling: Decimal::from(config.item_price_ceiling),
            reference_date: None,
        }
    }

    /// Set how many leading lines may hold the merchant name.
    pub fn with_merchant_scan_lines(mut self, lines: usize) -> Self {
        self.merchant_scan_lines = lines;
        self
    }

    /// Set the item price ceiling used before a total is known.
    pub fn with_item_price_ceiling(mut self, ceiling: Decimal) -> Self {
        self.item_price_ceiling = ceiling;
        self
    }

    /// Use a fixed date instead of the local date when none is printed.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Parse receipt text into structured data.
    pub fn parse(&self, text: &str) -> Result<ExtractedData> {
        self.parse_with_report(text).map(|r| r.data)
    }

    /// Read a text file and parse it.
    pub fn parse_file(&self, path: &Path) -> crate::error::Result<ExtractedData> {
        let text = std::fs::read_to_string(path)?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        Ok(self.parse(&text)?)
    }

    /// Parse receipt text and keep the diagnostics.
    pub fn parse_with_report(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ReceiptError::InvalidInput(
                "receipt text is empty".to_string(),
            ));
        }

        let lines = normalize_lines(text);
        if lines.is_empty() {
            return Err(ReceiptError::InvalidInput(
                "receipt text has no non-blank lines".to_string(),
            ));
        }

        info!("Parsing receipt from {} lines", lines.len());

        let merchant = MerchantExtractor::new()
            .with_scan_lines(self.merchant_scan_lines)
            .extract(&lines);
        let date = DateExtractor::new().extract(&lines);

        let state = classify_lines(&lines, self.item_price_ceiling);

        // Backfill each summary field from the items independently.
        let items_total = state.items_total();
        let total = if state.total.is_zero() && !state.items.is_empty() {
            items_total
        } else {
            state.total
        };
        let subtotal = if state.subtotal.is_zero() {
            items_total
        } else {
            state.subtotal
        };

        let confidence = score_confidence(&ConfidenceSignals {
            has_merchant: merchant.is_some(),
            has_date: date.is_some(),
            item_count: state.items.len(),
            total,
            subtotal,
            tax: state.tax,
        });

        let data = ExtractedData {
            merchant: merchant
                .as_ref()
                .map(|m| m.value.clone())
                .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string()),
            date: date
                .as_ref()
                .map(|d| d.value.clone())
                .unwrap_or_else(|| self.today()),
            total,
            items: state.items,
            tax: state.tax,
            subtotal,
            payment_method: state.payment_method,
            confidence,
        };

        debug!(
            "Extracted receipt from {} with {} items, total {}, confidence {:.2}",
            data.merchant,
            data.items.len(),
            data.total,
            data.confidence
        );

        let mut warnings = data.validate();
        if date.is_none() {
            warnings.push("No date found, using today".to_string());
        }

        Ok(ExtractionResult {
            merchant_line: merchant.map(|m| m.line),
            date_line: date.map(|d| d.line),
            lines: lines.into_iter().map(|l| l.text).collect(),
            data,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn today(&self) -> String {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for ReceiptParser {
    fn extract_from_text(&self, text: &str) -> Result<ExtractedData> {
        self.parse(text)
    }
}
