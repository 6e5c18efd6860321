//! WASM bindings for receipt text extraction.
//!
//! This crate exposes the receipt parser to browsers and Node.js. Returned
//! objects use the same camelCase field names as the JSON output.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use slip_core::models::config::ExtractionConfig;
use slip_core::models::receipt::ExtractedData;
use slip_core::receipt::ReceiptParser;
use slip_core::ReceiptError;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse receipt text into structured data.
///
/// Throws when `text` is not a string or has no non-blank lines.
#[wasm_bindgen(js_name = parseReceipt)]
pub fn parse_receipt(text: JsValue) -> Result<JsValue, JsValue> {
    let text = text.as_string().ok_or_else(|| {
        to_js_error(ReceiptError::InvalidInput(
            "receipt text must be a string".to_string(),
        ))
    })?;

    let data = ReceiptParser::new().parse(&text).map_err(to_js_error)?;
    to_js(&data)
}

fn to_js_error(err: ReceiptError) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    config: ExtractionConfig,
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            parser: ReceiptParser::from_config(&config),
            config,
        }
    }

    /// Reject item prices at or above `ceiling` while no total is known.
    #[wasm_bindgen(js_name = setItemPriceCeiling)]
    pub fn set_item_price_ceiling(&mut self, ceiling: f64) -> Result<(), JsValue> {
        let ceiling = Decimal::try_from(ceiling)
            .map_err(|e| JsValue::from_str(&format!("invalid ceiling: {}", e)))?;
        self.parser = self.parser.clone().with_item_price_ceiling(ceiling);
        Ok(())
    }

    /// Confidence below which `needsReview` reports true.
    #[wasm_bindgen(js_name = setReviewThreshold)]
    pub fn set_review_threshold(&mut self, threshold: f32) {
        self.config.review_threshold = threshold;
    }

    /// Extract receipt data from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let data = self.parser.parse(text).map_err(to_js_error)?;
        to_js(&data)
    }

    /// Whether the parsed text should be confirmed by a person.
    #[wasm_bindgen(js_name = needsReview)]
    pub fn needs_review(&self, text: &str) -> Result<bool, JsValue> {
        let data = self.parser.parse(text).map_err(to_js_error)?;
        Ok(data.needs_review(self.config.review_threshold))
    }

    /// Get extraction result with diagnostics.
    #[wasm_bindgen(js_name = extractWithReport)]
    pub fn extract_with_report(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse_with_report(text).map_err(to_js_error)?;

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ExtractReport {
            data: ExtractedData,
            lines: Vec<String>,
            warnings: Vec<String>,
            needs_review: bool,
            processing_time_ms: u64,
        }

        let needs_review = result.data.needs_review(self.config.review_threshold);
        let output = ExtractReport {
            data: result.data,
            lines: result.lines,
            warnings: result.warnings,
            needs_review,
            processing_time_ms: result.processing_time_ms,
        };

        to_js(&output)
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const DINER: &str = "Joe's Diner\n01/15/2024\nBurger 8.99\n2 x Fries 3.50\nSUBTOTAL 15.99\nTAX 1.28\nTOTAL 17.27\nVISA ENDING 1234";

    #[wasm_bindgen_test]
    fn test_parse_receipt() {
        let value = parse_receipt(JsValue::from_str(DINER)).unwrap();
        let data: ExtractedData = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(data.merchant, "Joe's Diner");
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.confidence, 1.0);
    }

    #[wasm_bindgen_test]
    fn test_rejects_non_string() {
        assert!(parse_receipt(JsValue::from_f64(42.0)).is_err());
        assert!(parse_receipt(JsValue::NULL).is_err());
        assert!(parse_receipt(JsValue::from_str("  \n ")).is_err());
    }

    #[wasm_bindgen_test]
    fn test_extractor_ceiling() {
        let mut extractor = ReceiptExtractor::new();
        extractor.set_item_price_ceiling(5.0).unwrap();

        let value = extractor.extract("Corner Shop\nGum 1.00\nWine 12.00").unwrap();
        let data: ExtractedData = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(data.items.len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_needs_review() {
        let mut extractor = ReceiptExtractor::new();
        assert!(!extractor.needs_review(DINER).unwrap());
        assert!(extractor.needs_review("Total $42.00").unwrap());

        extractor.set_review_threshold(0.4);
        assert!(!extractor.needs_review("Total $42.00").unwrap());
    }
}
