//! Receipt field extraction.

mod engine;
mod orchestrator;
pub mod rules;

pub use engine::{ExtractionEngine, FieldMatcher};
pub use orchestrator::ReceiptExtractor;

use crate::models::draft::Draft;

/// Extract a draft from raw OCR text with the default extractor.
pub fn extract(text: &str) -> Draft {
    ReceiptExtractor::new().run(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_matches_default_extractor() {
        let text = "Fresh Mart\n03/04/2024\nTOTAL\n$58.12";
        assert_eq!(extract(text), ReceiptExtractor::new().run(text));
        assert_eq!(extract("no numbers here"), Draft::empty());
    }
}
