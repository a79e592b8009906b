//! Rule-based value normalizers for receipt fields.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{format_amount, to_amount};
pub use dates::{parse_date_token, resolve, resolve_with_order};
