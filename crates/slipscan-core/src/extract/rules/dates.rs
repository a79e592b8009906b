//! Day/month disambiguation for numeric receipt dates.
//!
//! Receipts arrive from locales that write `MM/DD/YYYY` and `DD/MM/YYYY`
//! alike, and the text carries no locale signal. Tokens are read
//! month-first unless the first part can only be a day (first > 12 and
//! second <= 12). An explicit [`DateOrder`] hint overrides the heuristic.

use chrono::NaiveDate;

use crate::error::ExtractionError;
use crate::models::config::DateOrder;

/// Resolve an `A/B/C` token (also `A-B-C`, `A.B.C`) into a calendar date.
///
/// Returns `None` for malformed tokens and impossible dates.
pub fn resolve(token: &str) -> Option<NaiveDate> {
    parse_date_token(token, None).ok()
}

/// Like [`resolve`], but an explicit order takes precedence over the
/// month-first heuristic.
pub fn resolve_with_order(token: &str, order: Option<DateOrder>) -> Option<NaiveDate> {
    parse_date_token(token, order).ok()
}

/// Resolve a date token, reporting why it was rejected.
pub fn parse_date_token(
    token: &str,
    order: Option<DateOrder>,
) -> Result<NaiveDate, ExtractionError> {
    let invalid = || ExtractionError::InvalidDate(token.to_string());

    let parts: Vec<&str> = token.trim().split(['/', '-', '.']).collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    let year = parse_year(parts[2]).ok_or_else(invalid)?;
    let (first, second) = (numbers[0], numbers[1]);

    let (month, day) = match order.unwrap_or_else(|| infer_order(first, second)) {
        DateOrder::MonthFirst => (first, second),
        DateOrder::DayFirst => (second, first),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Day-first only when the first part cannot be a month but the second can.
fn infer_order(first: u32, second: u32) -> DateOrder {
    if first > 12 && second <= 12 {
        DateOrder::DayFirst
    } else {
        DateOrder::MonthFirst
    }
}

/// Four digits are a full year; one or two digits are years since 2000.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        4 => Some(year),
        1 | 2 => Some(2000 + year),
        _ => None,
    }
}
