//! Error types for the slipscan-core library.

use thiserror::Error;

use crate::models::draft::Field;

/// Main error type for the slipscan library.
#[derive(Error, Debug)]
pub enum SlipscanError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a field candidate into a value.
///
/// None of these abort an extraction: the orchestrator degrades the
/// affected field to absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No pattern matched the field.
    #[error("no match for {0}")]
    NoMatch(Field),

    /// The token does not name a real calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The token is not a two-decimal non-negative amount.
    #[error("unparseable amount: {0}")]
    UnparseableAmount(String),
}

/// Errors reported by an OCR provider.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with an error.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider answered without any text annotation.
    #[error("no text in provider response")]
    EmptyResponse,

    /// The image payload could not be read.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the slipscan library.
pub type Result<T> = std::result::Result<T, SlipscanError>;
