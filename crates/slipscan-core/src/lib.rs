//! Core library for receipt OCR text extraction.
//!
//! This crate provides:
//! - Ranked field matchers over raw OCR text (date, total)
//! - Day/month disambiguation for numeric date tokens
//! - Currency-safe amount normalization
//! - A fail-soft orchestrator producing a reviewable [`Draft`]
//! - The handoff from a draft to an editable expense form

pub mod error;
pub mod extract;
pub mod handoff;
pub mod models;

pub use error::{ExtractionError, OcrError, Result, SlipscanError};
pub use extract::{extract, ExtractionEngine, ReceiptExtractor};
pub use handoff::{Expense, FormDefaults, FormIssue, SubmitError};
pub use models::config::{DateOrder, SlipscanConfig};
pub use models::draft::{Draft, Field, FieldCandidate};
