//! Handoff from an extraction [`Draft`] to the editable expense form.
//!
//! The draft only prefills the form. Present fields become pre-populated
//! inputs, absent fields stay empty, and nothing is guaranteed to be
//! submittable until the user has reviewed it. Submission produces a new
//! [`Expense`]; the draft itself is consumed, never edited.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::rules::format_amount;
use crate::models::config::FormConfig;
use crate::models::draft::Draft;

/// Initial and edited values of the expense form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub date: Option<NaiveDate>,
    pub merchant: String,
    pub total: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub currency: String,
    pub category: String,
    pub notes: String,
}

/// A submit-time validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormIssue {
    #[error("Date is required")]
    MissingDate,

    #[error("Merchant is required")]
    MissingMerchant,

    #[error("Total amount is required")]
    MissingTotal,

    #[error("Amount must be greater than 0")]
    NonPositiveTotal,

    #[error("Tax cannot be negative")]
    NegativeTax,

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Category is required")]
    MissingCategory,
}

/// The form could not be submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expense form has {} issue(s)", .0.len())]
pub struct SubmitError(pub Vec<FormIssue>);

/// Expense record created from a reviewed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub merchant: String,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    pub currency: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FormDefaults {
    /// Prefill the form from a draft.
    pub fn prefill(draft: Draft, config: &FormConfig) -> Self {
        Self {
            date: draft.date,
            merchant: draft.merchant.unwrap_or_default(),
            total: draft.total,
            tax: draft.tax,
            currency: config.default_currency.clone(),
            category: config.default_category(),
            notes: String::new(),
        }
    }

    /// Input values as the form renders them; absent values are empty.
    pub fn inputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date", self.date.map(|d| d.to_string()).unwrap_or_default()),
            ("merchant", self.merchant.clone()),
            ("total", self.total.map(format_amount).unwrap_or_default()),
            ("tax", self.tax.map(format_amount).unwrap_or_default()),
            ("currency", self.currency.clone()),
            ("category", self.category.clone()),
            ("notes", self.notes.clone()),
        ]
    }

    /// Check the form the way it is checked at submission.
    pub fn validate(&self, config: &FormConfig) -> Vec<FormIssue> {
        let mut issues = Vec::new();

        if self.date.is_none() {
            issues.push(FormIssue::MissingDate);
        }

        if self.merchant.trim().is_empty() {
            issues.push(FormIssue::MissingMerchant);
        }

        match self.total {
            None => issues.push(FormIssue::MissingTotal),
            Some(total) if total <= Decimal::ZERO => issues.push(FormIssue::NonPositiveTotal),
            Some(_) => {}
        }

        if self.tax.is_some_and(|tax| tax < Decimal::ZERO) {
            issues.push(FormIssue::NegativeTax);
        }

        if !config.supports_currency(&self.currency) {
            issues.push(FormIssue::UnsupportedCurrency(self.currency.clone()));
        }

        if self.category.trim().is_empty() {
            issues.push(FormIssue::MissingCategory);
        }

        issues
    }

    /// Validate and turn the form into an expense record.
    pub fn submit(self, config: &FormConfig) -> Result<Expense, SubmitError> {
        let issues = self.validate(config);

        match (self.date, self.total) {
            (Some(date), Some(total)) if issues.is_empty() => {
                let notes = self.notes.trim();
                Ok(Expense {
                    date,
                    merchant: self.merchant.trim().to_string(),
                    total,
                    tax: self.tax,
                    currency: self.currency,
                    category: self.category,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                })
            }
            _ => Err(SubmitError(issues)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use crate::extract;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_prefill_from_draft() {
        let draft = extract::extract("Fresh Mart\n03/04/2024\nTOTAL\n$58.12");
        let form = FormDefaults::prefill(draft, &FormConfig::default());

        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(form.merchant, "");
        assert_eq!(form.total, Some(dec("58.12")));
        assert_eq!(form.tax, Some(dec("0.00")));
        assert_eq!(form.currency, "CAD");
        assert_eq!(form.category, "Food & Dining");
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let form = FormDefaults::prefill(Draft::empty(), &FormConfig::default());
        let inputs = form.inputs();

        assert_eq!(inputs[0], ("date", String::new()));
        assert_eq!(inputs[2], ("total", String::new()));
        assert_eq!(inputs[3], ("tax", "0.00".to_string()));
    }

    #[test]
    fn test_empty_draft_is_not_submittable() {
        let config = FormConfig::default();
        let form = FormDefaults::prefill(Draft::empty(), &config);

        assert_eq!(
            form.validate(&config),
            vec![
                FormIssue::MissingDate,
                FormIssue::MissingMerchant,
                FormIssue::MissingTotal
            ]
        );
        assert!(form.submit(&config).is_err());
    }

    #[test]
    fn test_submit_after_review() {
        let config = FormConfig::default();
        let draft = extract::extract("03/04/2024\nTOTAL\n$58.12");

        let mut form = FormDefaults::prefill(draft, &config);
        form.merchant = " Fresh Mart ".to_string();
        form.category = "Shopping".to_string();

        let expense = form.submit(&config).unwrap();
        assert_eq!(expense.merchant, "Fresh Mart");
        assert_eq!(expense.total, dec("58.12"));
        assert_eq!(expense.tax, Some(dec("0.00")));
        assert_eq!(expense.notes, None);
    }

    #[test]
    fn test_amount_and_currency_rules() {
        let config = FormConfig::default();
        let form = FormDefaults {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            merchant: "Cafe".to_string(),
            total: Some(Decimal::ZERO),
            tax: Some(dec("-1.00")),
            currency: "XYZ".to_string(),
            category: " ".to_string(),
            notes: String::new(),
        };

        assert_eq!(
            form.validate(&config),
            vec![
                FormIssue::NonPositiveTotal,
                FormIssue::NegativeTax,
                FormIssue::UnsupportedCurrency("XYZ".to_string()),
                FormIssue::MissingCategory,
            ]
        );
        assert_eq!(
            form.submit(&config).unwrap_err().to_string(),
            "expense form has 4 issue(s)"
        );
    }
}
