//! Error types for the slip-core library.

use thiserror::Error;

/// Main error type for the slip library.
#[derive(Error, Debug)]
pub enum SlipError {
    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Receipt(#[from] ReceiptError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while parsing receipt text.
///
/// Missing merchants, dates or totals are not errors; they lower the
/// confidence score instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// The input is blank or otherwise unusable as receipt text.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the slip library.
pub type Result<T> = std::result::Result<T, SlipError>;
