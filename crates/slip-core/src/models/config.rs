//! Configuration structures for receipt extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlipError};

/// Main configuration for slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipConfig {
    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration for the CLI.
    pub output: OutputConfig,
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines searched for the merchant name.
    pub merchant_scan_lines: usize,

    /// Item prices at or above this are rejected while no total is known.
    pub item_price_ceiling: u32,

    /// Confidence below which a receipt is flagged for manual review.
    pub review_threshold: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            merchant_scan_lines: 3,
            item_price_ceiling: 1000,
            review_threshold: 0.7,
        }
    }
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: "json", "csv" or "text".
    pub default_format: String,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            pretty: false,
        }
    }
}

impl SlipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.merchant_scan_lines == 0 {
            return Err(SlipError::Config(
                "extraction.merchant_scan_lines must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.extraction.review_threshold) {
            return Err(SlipError::Config(
                "extraction.review_threshold must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
