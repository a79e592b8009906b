//! Amount normalization for receipt totals and tax.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_STRICT;
use crate::error::ExtractionError;

/// Parse a matched amount (e.g. "1,234.56" or "58.12") into a decimal.
///
/// Thousands separators are stripped; the remainder must be digits with
/// exactly two fractional digits. No currency symbol is interpreted.
pub fn to_amount(raw: &str) -> Result<Decimal, ExtractionError> {
    let unparseable = || ExtractionError::UnparseableAmount(raw.to_string());

    let cleaned = raw.trim().replace(',', "");
    let caps = AMOUNT_STRICT.captures(&cleaned).ok_or_else(unparseable)?;

    let amount = Decimal::from_str(&format!("{}.{}", &caps[1], &caps[2]))
        .map_err(|_| unparseable())?;

    if amount.is_sign_negative() {
        return Err(unparseable());
    }

    Ok(amount)
}

/// Format an amount with two fractional digits for form inputs.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
