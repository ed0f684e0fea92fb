//! Publication date normalization.
//!
//! Detail pages expose their date in several shapes (ISO timestamps in
//! `datetime`/`content` attributes, `YYYY/MM/DD` in URLs or text). All of them
//! are reduced to the canonical `YYYY/MM/DD`.

use once_cell::sync::Lazy;
use regex::Regex;

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})[-/](\d{2})[-/](\d{2})").unwrap());

/// Reduce a raw date string to `YYYY/MM/DD`.
///
/// Uses the first `YYYY-MM-DD` / `YYYY/MM/DD` run found anywhere in `raw`.
/// Month and day ranges are not validated. Returns an empty string when
/// nothing matches.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_date("2024-05-01T10:00:00Z"), "2024/05/01");
/// assert_eq!(normalize_date("sem data"), "");
/// ```
pub fn normalize_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match DATE.captures(raw) {
        Some(c) => format!("{}/{}/{}", &c[1], &c[2], &c[3]),
        None => String::new(),
    }
}
