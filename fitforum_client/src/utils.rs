use chrono::DateTime;

/// Renders a server timestamp as e.g. `Mar 4, 2025`; unparseable input is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn pluralize_replies(count: usize) -> String {
    if count == 1 {
        "1 reply".to_string()
    } else {
        format!("{count} replies")
    }
}
