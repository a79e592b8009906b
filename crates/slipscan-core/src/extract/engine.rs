//! Ranked pattern matching over raw OCR text.

use regex::Regex;
use tracing::trace;

use crate::models::draft::{Field, FieldCandidate};

use super::rules::patterns::{
    DATE_FULL_YEAR, DATE_SHORT_YEAR, DOLLAR_AMOUNT, TOTAL_TITLE, TOTAL_UPPER,
};

/// One pattern for one field.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    /// Target field.
    pub field: Field,
    /// Position in the field's precedence order (1 = tried first).
    pub rank: u8,
    pattern: Regex,
    /// Capture group holding the value; 0 for the whole match.
    group: usize,
}

impl FieldMatcher {
    pub fn new(field: Field, rank: u8, pattern: Regex, group: usize) -> Self {
        Self {
            field,
            rank,
            pattern,
            group,
        }
    }

    /// Find the first match anywhere in the text.
    pub fn find(&self, text: &str) -> Option<FieldCandidate> {
        let caps = self.pattern.captures(text)?;
        let value = caps.get(self.group)?;
        Some(FieldCandidate::new(self.field, value.as_str(), self.rank))
    }
}

/// Ordered matchers for every field.
///
/// Merchant and tax have no matchers: merchants carry no reliable signal
/// and tax is always the zero default.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    matchers: Vec<FieldMatcher>,
}

impl ExtractionEngine {
    /// Engine with the built-in receipt matchers.
    pub fn new() -> Self {
        Self::empty()
            .with_matcher(FieldMatcher::new(Field::Total, 1, TOTAL_UPPER.clone(), 1))
            .with_matcher(FieldMatcher::new(Field::Total, 2, TOTAL_TITLE.clone(), 1))
            .with_matcher(FieldMatcher::new(Field::Total, 3, DOLLAR_AMOUNT.clone(), 1))
            .with_matcher(FieldMatcher::new(Field::Date, 1, DATE_FULL_YEAR.clone(), 0))
            .with_matcher(FieldMatcher::new(Field::Date, 2, DATE_SHORT_YEAR.clone(), 0))
    }

    /// Engine without any matchers.
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Add a matcher, keeping each field's list in rank order.
    pub fn with_matcher(mut self, matcher: FieldMatcher) -> Self {
        self.matchers.push(matcher);
        self.matchers.sort_by_key(|m| m.rank);
        self
    }

    /// Matchers for one field, most specific first.
    pub fn matchers(&self, field: Field) -> impl Iterator<Item = &FieldMatcher> {
        self.matchers.iter().filter(move |m| m.field == field)
    }

    /// Highest-ranked candidate for a field. Lower-ranked matchers are not
    /// tried once one matches.
    pub fn best_candidate(&self, text: &str, field: Field) -> Option<FieldCandidate> {
        self.matchers(field).find_map(|matcher| {
            let candidate = matcher.find(text);
            if candidate.is_none() {
                trace!("No {} match at rank {}", field, matcher.rank);
            }
            candidate
        })
    }

    /// At most one candidate per field, in draft field order.
    pub fn candidates(&self, text: &str) -> Vec<FieldCandidate> {
        Field::ALL
            .iter()
            .filter_map(|&field| self.best_candidate(text, field))
            .collect()
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}
