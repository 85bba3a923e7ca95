//! Free-text date parsing.
//!
//! Plan and sprint files are edited by hand, so dates show up in several
//! notations. An empty or unreadable cell is an ordinary "no date", not an error.

use chrono::NaiveDate;

/// Accepted notations, tried in order.
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Notation used when writing dates back to plan files.
pub const OUTPUT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a date using the first notation that accepts the whole string.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok());

    if parsed.is_none() {
        tracing::debug!("Unparsable date treated as absent: {:?}", value);
    }
    parsed
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

/// Format an optional date, leaving the cell empty when absent.
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}
