//! CSS length helpers.

/// Parse a computed CSS length the way `parseInt` does: optional sign,
/// leading decimal digits, everything after is ignored.
///
/// Returns `None` when no digits lead the value (`"auto"`, `""`).
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: f64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Format a pixel length for an inline style.
#[must_use]
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}
