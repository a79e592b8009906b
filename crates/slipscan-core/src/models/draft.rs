//! Draft produced by a single extraction call.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax assumed for receipts without an itemized tax line (`0.00`).
pub fn default_tax() -> Decimal {
    Decimal::new(0, 2)
}

/// A field the extractor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Merchant,
    Date,
    Total,
    Tax,
}

impl Field {
    /// All fields, in draft order.
    pub const ALL: [Field; 4] = [Field::Merchant, Field::Date, Field::Total, Field::Tax];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Merchant => "merchant",
            Field::Date => "date",
            Field::Total => "total",
            Field::Tax => "tax",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A substring matched by one pattern for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    /// Target field.
    pub field: Field,
    /// Matched value token (the capture, not the label).
    pub value: String,
    /// Rank of the pattern that produced it (1 = most specific).
    pub rank: u8,
}

impl FieldCandidate {
    pub fn new(field: Field, value: impl Into<String>, rank: u8) -> Self {
        Self {
            field,
            value: value.into(),
            rank,
        }
    }
}

/// Best-effort structured result of extracting one receipt.
///
/// Every present field has passed validation. `tax` is present as
/// [`default_tax`] when no tax value is known; the other fields stay absent
/// when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Merchant name. Only ever filled in by the user.
    pub merchant: Option<String>,

    /// Transaction date.
    pub date: Option<NaiveDate>,

    /// Total amount, two fractional digits.
    pub total: Option<Decimal>,

    /// Tax amount, two fractional digits.
    pub tax: Option<Decimal>,
}

impl Draft {
    /// Draft with every field absent except the defaulted tax.
    pub fn empty() -> Self {
        Self {
            merchant: None,
            date: None,
            total: None,
            tax: Some(default_tax()),
        }
    }

    /// Fields that could not be filled in.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.merchant.is_none() {
            missing.push(Field::Merchant);
        }
        if self.date.is_none() {
            missing.push(Field::Date);
        }
        if self.total.is_none() {
            missing.push(Field::Total);
        }
        if self.tax.is_none() {
            missing.push(Field::Tax);
        }
        missing
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::empty()
    }
}
