//! Regex patterns for receipt field extraction.
//!
//! Patterns are case-sensitive. Amount captures always have exactly two
//! fractional digits and may carry `,` thousands separators.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Totals, most specific first. The value must sit on a line after its
    // label; `ITEMS TOTAL 38.00` is not a total.
    pub static ref TOTAL_UPPER: Regex = Regex::new(
        r"\bTOTAL:?[ \t]*\r?\n\s*\$?(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})"
    ).unwrap();

    pub static ref TOTAL_TITLE: Regex = Regex::new(
        r"\bTotal:?[ \t]*\r?\n\s*(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})"
    ).unwrap();

    pub static ref DOLLAR_AMOUNT: Regex = Regex::new(
        r"\$\s*(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})"
    ).unwrap();

    // Numeric dates, same separator twice.
    pub static ref DATE_FULL_YEAR: Regex = Regex::new(
        r"\b(?:\d{1,2}/\d{1,2}/\d{4}|\d{1,2}-\d{1,2}-\d{4}|\d{1,2}\.\d{1,2}\.\d{4})\b"
    ).unwrap();

    pub static ref DATE_SHORT_YEAR: Regex = Regex::new(
        r"\b(?:\d{1,2}/\d{1,2}/\d{2}|\d{1,2}-\d{1,2}-\d{2}|\d{1,2}\.\d{1,2}\.\d{2})\b"
    ).unwrap();

    // Strict shape accepted by the amount normalizer.
    pub static ref AMOUNT_STRICT: Regex = Regex::new(
        r"^(\d+)\.(\d{2})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_labels_are_case_sensitive() {
        assert!(TOTAL_UPPER.is_match("TOTAL\n$42.50"));
        assert!(!TOTAL_UPPER.is_match("Total\n$42.50"));
        assert!(TOTAL_TITLE.is_match("Total\n17.00"));
        assert!(!TOTAL_TITLE.is_match("TOTAL\n17.00"));
    }

    #[test]
    fn test_subtotal_is_not_a_total() {
        assert!(!TOTAL_UPPER.is_match("SUBTOTAL\n$40.00"));
    }

    #[test]
    fn test_total_value_must_follow_line_break() {
        assert!(!TOTAL_UPPER.is_match("ITEMS TOTAL 38.00"));
        assert!(!TOTAL_UPPER.is_match("TOTAL $38.00"));
        assert!(!TOTAL_TITLE.is_match("Sub Total 15.00"));

        let caps = TOTAL_UPPER.captures("TOTAL  \n  $42.50").unwrap();
        assert_eq!(&caps[1], "42.50");
        let caps = TOTAL_TITLE.captures("Total\t\r\n 17.00").unwrap();
        assert_eq!(&caps[1], "17.00");
    }

    #[test]
    fn test_thousands_separator_capture() {
        let caps = TOTAL_UPPER.captures("TOTAL:\n$1,234.56").unwrap();
        assert_eq!(&caps[1], "1,234.56");
    }

    #[test]
    fn test_date_separators_must_agree() {
        assert!(DATE_FULL_YEAR.is_match("03/04/2024"));
        assert!(DATE_FULL_YEAR.is_match("03-04-2024"));
        assert!(DATE_FULL_YEAR.is_match("03.04.2024"));
        assert!(!DATE_FULL_YEAR.is_match("03/04-2024"));
    }

    #[test]
    fn test_short_year_does_not_cut_full_year() {
        assert!(!DATE_SHORT_YEAR.is_match("03/04/2024"));
        assert!(DATE_SHORT_YEAR.is_match("03/04/24"));
    }
}
