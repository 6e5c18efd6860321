//! Data models for extracted receipts and configuration.

pub mod config;
pub mod receipt;
