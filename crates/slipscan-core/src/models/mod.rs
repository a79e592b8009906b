//! Data models for receipt extraction.

pub mod config;
pub mod draft;

pub use config::{DateOrder, ExtractionConfig, FormConfig, OcrConfig, SlipscanConfig};
pub use draft::{Draft, Field, FieldCandidate};
