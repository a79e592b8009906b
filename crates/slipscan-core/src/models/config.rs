//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlipscanError};

/// Main configuration for slipscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipscanConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Expense form configuration.
    pub form: FormConfig,
}

/// Order of the first two parts of a numeric date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY`.
    MonthFirst,
    /// `DD/MM/YYYY`.
    DayFirst,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Locale hint for numeric dates. When unset, the first two parts are
    /// read month-first unless only the day-first reading is valid.
    pub date_order: Option<DateOrder>,
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Image annotation endpoint.
    pub endpoint: String,

    /// API key for the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Expense form defaults and submission rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Currency preselected in the form.
    pub default_currency: String,

    /// Currencies the form accepts.
    pub currencies: Vec<String>,

    /// Expense categories; the first one is preselected.
    pub categories: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_currency: "CAD".to_string(),
            currencies: ["USD", "EUR", "GBP", "CAD", "AUD", "JPY", "CNY", "INR"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            categories: [
                "Food & Dining",
                "Transportation",
                "Entertainment",
                "Shopping",
                "Utilities",
                "Health",
                "Travel",
                "Education",
                "Business",
                "Other",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl FormConfig {
    /// Category preselected in the form.
    pub fn default_category(&self) -> String {
        self.categories.first().cloned().unwrap_or_default()
    }

    /// Check whether a currency code is accepted.
    pub fn supports_currency(&self, currency: &str) -> bool {
        self.currencies.iter().any(|c| c == currency)
    }
}

impl SlipscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| SlipscanError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SlipscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_form_defaults() {
        let form = FormConfig::default();
        assert_eq!(form.default_currency, "CAD");
        assert_eq!(form.default_category(), "Food & Dining");
        assert!(form.supports_currency("JPY"));
        assert!(!form.supports_currency("PLN"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SlipscanConfig =
            serde_json::from_str(r#"{"extraction": {"date_order": "day_first"}}"#).unwrap();
        assert_eq!(config.extraction.date_order, Some(DateOrder::DayFirst));
        assert_eq!(config.ocr.timeout_secs, 30);
        assert_eq!(config.form.currencies.len(), 8);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SlipscanConfig::default();
        config.form.default_currency = "EUR".to_string();
        config.save(&path).unwrap();

        let loaded = SlipscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.form.default_currency, "EUR");
        assert_eq!(loaded.extraction.date_order, None);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            SlipscanConfig::from_file(&path),
            Err(SlipscanError::Config(_))
        ));
    }
}
