//! Core library for receipt text extraction.
//!
//! This crate provides:
//! - Line normalization for raw OCR/plain-text receipt dumps
//! - Rule-based extraction of merchant, date, line items, tax, totals and payment method
//! - A heuristic confidence score for the extracted data
//! - Receipt data models and configuration

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{ReceiptError, Result, SlipError};
pub use models::config::{ExtractionConfig, SlipConfig};
pub use models::receipt::{ExtractedData, ReceiptItem, UNKNOWN_MERCHANT};
pub use receipt::{ExtractionResult, ReceiptExtractor, ReceiptParser, parse_receipt};
