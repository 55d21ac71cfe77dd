//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse an RFC3339 datetime string and normalize it to UTC
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Build a positional placeholder list for `count` bound values
///
/// # Examples
///
/// ```
/// use ask_db::utils::placeholders;
///
/// assert_eq!(placeholders(3), "?, ?, ?");
/// assert_eq!(placeholders(1), "?");
/// ```
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(19).matches('?').count(), 19);
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_datetime("2024-01-01T12:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        // Offsets are normalized to UTC
        let parsed = parse_datetime("2024-06-01T08:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-06-01T06:30:00+00:00");

        assert!(parse_datetime("invalid").is_err());
    }
}
