//! Best-effort coercion of hour estimates.

/// Parse an hour estimate, accepting a comma decimal separator.
///
/// Missing, non-numeric, non-finite and negative values all coerce to zero.
pub fn parse_hours(raw: &str) -> f64 {
    parse_optional_hours(raw).unwrap_or(0.0)
}

/// Like [`parse_hours`], but keeps an empty cell distinct from zero.
pub fn parse_optional_hours(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    match value.replace(',', ".").parse::<f64>() {
        Ok(hours) if hours.is_finite() => Some(hours.max(0.0)),
        _ => {
            tracing::debug!("Unparsable hour value coerced to zero: {:?}", value);
            Some(0.0)
        }
    }
}

/// Round to one decimal place, the precision of every allocated share.
///
/// Halves go to the even neighbour, so 1.25 becomes 1.2.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round_ties_even() / 10.0
}

/// Render hours with at least one decimal place (`12.0`, `4.5`, `0.25`).
pub fn format_hours(hours: f64) -> String {
    let text = hours.to_string();
    if text.contains('.') || text.contains('e') {
        text
    } else {
        format!("{}.0", text)
    }
}
