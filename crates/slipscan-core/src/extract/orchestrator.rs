//! Fail-soft composition of matching and normalization into a [`Draft`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, OcrError};
use crate::models::config::{DateOrder, ExtractionConfig};
use crate::models::draft::{Draft, Field, FieldCandidate};

use super::engine::ExtractionEngine;
use super::rules::{parse_date_token, to_amount};

/// Turns raw OCR text into a reviewable draft.
///
/// Pure text-in, draft-out: no I/O, no retries, no state kept between
/// calls. A field whose candidate cannot be normalized is left absent
/// without affecting the others.
#[derive(Debug, Clone, Default)]
pub struct ReceiptExtractor {
    engine: ExtractionEngine,
    date_order: Option<DateOrder>,
}

impl ReceiptExtractor {
    /// Create an extractor with the built-in matchers and no locale hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_date_order(config.date_order)
    }

    /// Set the date order hint.
    pub fn with_date_order(mut self, order: Option<DateOrder>) -> Self {
        self.date_order = order;
        self
    }

    /// Replace the matcher set.
    pub fn with_engine(mut self, engine: ExtractionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Extract a draft from raw OCR text. Never fails.
    pub fn run(&self, text: &str) -> Draft {
        info!("Extracting receipt draft from {} characters of text", text.len());

        let mut draft = Draft::empty();
        let candidates = self.engine.candidates(text);

        for e in unmatched(&candidates) {
            degrade(e);
        }

        for candidate in candidates {
            debug!(
                "Candidate for {} at rank {}: {:?}",
                candidate.field, candidate.rank, candidate.value
            );

            match candidate.field {
                Field::Merchant => draft.merchant = self.merchant(&candidate),
                Field::Date => draft.date = self.date(&candidate),
                Field::Total => draft.total = self.amount(&candidate),
                Field::Tax => {
                    if let Some(tax) = self.amount(&candidate) {
                        draft.tax = Some(tax);
                    }
                }
            }
        }

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            debug!("Draft left without {:?}", missing);
        }

        draft
    }

    /// Extract a draft from the outcome of an OCR call.
    ///
    /// Any provider failure is treated as "no text".
    pub fn run_ocr_output(&self, ocr: Result<String, OcrError>) -> Draft {
        match ocr {
            Ok(text) => self.run(&text),
            Err(e) => {
                warn!("OCR failed, continuing without text: {}", e);
                self.run("")
            }
        }
    }

    fn merchant(&self, candidate: &FieldCandidate) -> Option<String> {
        let name = candidate.value.trim();
        if name.is_empty() {
            degrade(ExtractionError::NoMatch(Field::Merchant));
            return None;
        }
        Some(name.to_string())
    }

    fn date(&self, candidate: &FieldCandidate) -> Option<NaiveDate> {
        parse_date_token(&candidate.value, self.date_order)
            .map_err(degrade)
            .ok()
    }

    fn amount(&self, candidate: &FieldCandidate) -> Option<Decimal> {
        to_amount(&candidate.value).map_err(degrade).ok()
    }
}

/// A `NoMatch` for every field without a candidate.
fn unmatched(candidates: &[FieldCandidate]) -> Vec<ExtractionError> {
    Field::ALL
        .iter()
        .filter(|field| !candidates.iter().any(|c| c.field == **field))
        .map(|&field| ExtractionError::NoMatch(field))
        .collect()
}

fn degrade(e: ExtractionError) {
    debug!("Dropping field: {}", e);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use std::str::FromStr;

    use crate::extract::FieldMatcher;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let text = "Fresh Mart\n03/04/2024\nTOTAL\n$58.12\n";
        let draft = ReceiptExtractor::new().run(text);

        assert_eq!(
            draft,
            Draft {
                merchant: None,
                date: NaiveDate::from_ymd_opt(2024, 3, 4),
                total: Some(dec("58.12")),
                tax: Some(dec("0.00")),
            }
        );
    }

    #[test]
    fn test_empty_text_is_fail_soft() {
        let draft = ReceiptExtractor::new().run("");
        assert_eq!(draft, Draft::empty());
        assert_eq!(draft.tax.unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_total_label_anywhere_in_text() {
        let extractor = ReceiptExtractor::new();
        for text in [
            "TOTAL\n$42.50",
            "Corner Shop\nMilk 2.10\nSUBTOTAL\n$40.00\nTOTAL\n$42.50\nVISA",
            "Total\n17.00\nTOTAL\n$42.50",
        ] {
            assert_eq!(extractor.run(text).total, Some(dec("42.50")), "{text:?}");
        }
    }

    #[test]
    fn test_same_line_label_does_not_shadow_total() {
        let extractor = ReceiptExtractor::new();

        let draft = extractor.run("Corner Shop\nITEMS TOTAL 38.00\nHST 4.50\nTOTAL\n$42.50\n");
        assert_eq!(draft.total, Some(dec("42.50")));

        let draft = extractor.run("Sub Total 15.00\nTotal\n17.00\n");
        assert_eq!(draft.total, Some(dec("17.00")));
    }

    #[test]
    fn test_total_tolerates_padding_around_line_break() {
        let draft = ReceiptExtractor::new().run("TOTAL  \n  $42.50");
        assert_eq!(draft.total, Some(dec("42.50")));
    }

    #[test]
    fn test_same_line_total_is_not_labelled() {
        let draft = ReceiptExtractor::new().run("ITEMS TOTAL 38.00\nTotal 17.00");
        assert_eq!(draft.total, None);
    }

    #[test]
    fn test_unmatched_fields() {
        let engine = ExtractionEngine::new();

        assert_eq!(
            unmatched(&engine.candidates("")),
            Field::ALL
                .iter()
                .map(|&f| ExtractionError::NoMatch(f))
                .collect::<Vec<_>>()
        );
        assert_eq!(
            unmatched(&engine.candidates("03/04/2024\nTOTAL\n$58.12")),
            vec![
                ExtractionError::NoMatch(Field::Merchant),
                ExtractionError::NoMatch(Field::Tax)
            ]
        );
    }

    #[test]
    fn test_title_total_without_dollar_sign() {
        let draft = ReceiptExtractor::new().run("Bakery\nTotal\n17.00\nCash");
        assert_eq!(draft.total, Some(dec("17.00")));
    }

    #[test]
    fn test_invalid_date_only_drops_date() {
        let draft = ReceiptExtractor::new().run("13/13/2024\nTOTAL\n$5.00");
        assert_eq!(draft.date, None);
        assert_eq!(draft.total, Some(dec("5.00")));
    }

    #[test]
    fn test_invalid_top_ranked_date_is_not_retried() {
        let draft = ReceiptExtractor::new().run("02/30/2024\n03/04/24");
        assert_eq!(draft.date, None);
    }

    #[test]
    fn test_unparseable_amount_only_drops_total() {
        let engine = ExtractionEngine::new().with_matcher(FieldMatcher::new(
            Field::Total,
            0,
            Regex::new(r"AMOUNT (\S+)").unwrap(),
            1,
        ));
        let draft = ReceiptExtractor::new()
            .with_engine(engine)
            .run("AMOUNT abc\n03/04/2024\nTOTAL\n$1.00");

        assert_eq!(draft.total, None);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn test_day_first_date_in_text() {
        let draft = ReceiptExtractor::new().run("Cafe\n15/03/2024\nTotal\n4.20");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_date_order_hint() {
        let extractor = ReceiptExtractor::from_config(&ExtractionConfig {
            date_order: Some(DateOrder::DayFirst),
        });
        let draft = extractor.run("03/04/2024");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 4, 3));
    }

    #[test]
    fn test_run_is_idempotent() {
        let extractor = ReceiptExtractor::new();
        let text = "Fresh Mart\n03/04/2024\nTOTAL\n$58.12";
        assert_eq!(extractor.run(text), extractor.run(text));
    }

    #[test]
    fn test_ocr_failure_yields_empty_draft() {
        let draft = ReceiptExtractor::new().run_ocr_output(Err(OcrError::EmptyResponse));
        assert_eq!(draft, Draft::empty());

        let draft = ReceiptExtractor::new().run_ocr_output(Ok("TOTAL\n$1.50".to_string()));
        assert_eq!(draft.total, Some(dec("1.50")));
    }
}
