//! WASM bindings for receipt draft extraction.
//!
//! The browser runs OCR itself and passes the recognized text here; the
//! returned form defaults prefill the expense form.

use wasm_bindgen::prelude::*;

use slipscan_core::extract::rules;
use slipscan_core::models::FormConfig;
use slipscan_core::{DateOrder, Draft, FormDefaults, OcrError, ReceiptExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract a draft from OCR text with default settings.
#[wasm_bindgen]
pub fn extract_draft(text: &str) -> Result<JsValue, JsValue> {
    to_js(&slipscan_core::extract(text))
}

/// Resolve a numeric date token to `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn resolve_date(token: &str) -> Option<String> {
    rules::resolve(token).map(|d| d.to_string())
}

/// Normalize an amount string; the result keeps two fractional digits.
#[wasm_bindgen]
pub fn normalize_amount(raw: &str) -> Option<String> {
    rules::to_amount(raw).ok().map(rules::format_amount)
}

/// Receipt scanner for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    extractor: ReceiptExtractor,
    form: FormConfig,
}

#[wasm_bindgen]
impl ReceiptScanner {
    /// Create a scanner with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: ReceiptExtractor::new(),
            form: FormConfig::default(),
        }
    }

    /// Set the date order hint: "month_first", "day_first" or "" for the
    /// numeric heuristic.
    #[wasm_bindgen]
    pub fn set_date_order(&mut self, order: &str) -> Result<(), JsValue> {
        let order = match order {
            "" => None,
            "month_first" => Some(DateOrder::MonthFirst),
            "day_first" => Some(DateOrder::DayFirst),
            other => return Err(JsValue::from_str(&format!("unknown date order: {}", other))),
        };
        self.extractor = self.extractor.clone().with_date_order(order);
        Ok(())
    }

    /// Set the currency preselected in the form.
    #[wasm_bindgen]
    pub fn set_default_currency(&mut self, currency: &str) {
        self.form.default_currency = currency.to_string();
    }

    /// Extract a draft from OCR text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.run(text))
    }

    /// Extract a draft and turn it into form defaults.
    #[wasm_bindgen]
    pub fn prefill(&self, text: &str) -> Result<JsValue, JsValue> {
        self.prefill_draft(self.extractor.run(text))
    }

    /// Form defaults after the browser's OCR call failed.
    #[wasm_bindgen]
    pub fn prefill_after_ocr_failure(&self, message: &str) -> Result<JsValue, JsValue> {
        web_sys::console::warn_1(&JsValue::from_str(&format!("OCR failed: {}", message)));
        let draft = self
            .extractor
            .run_ocr_output(Err(OcrError::Provider(message.to_string())));
        self.prefill_draft(draft)
    }

    /// Validate reviewed form values and return the expense record.
    ///
    /// Rejects with an array of issue messages when the form is incomplete.
    #[wasm_bindgen]
    pub fn submit(&self, form: JsValue) -> Result<JsValue, JsValue> {
        let form: FormDefaults = serde_wasm_bindgen::from_value(form)?;

        match form.submit(&self.form) {
            Ok(expense) => to_js(&expense),
            Err(e) => {
                let issues = js_sys::Array::new();
                for issue in &e.0 {
                    issues.push(&JsValue::from_str(&issue.to_string()));
                }
                Err(issues.into())
            }
        }
    }

    fn prefill_draft(&self, draft: Draft) -> Result<JsValue, JsValue> {
        to_js(&FormDefaults::prefill(draft, &self.form))
    }
}

impl Default for ReceiptScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
