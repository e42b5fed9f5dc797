use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// Placeholder shown when an event carries no usable timestamp.
pub const UNKNOWN_TIME: &str = "Unknown time";

/// Parse a server timestamp into UTC.
///
/// The backend emits RFC 3339 with a `Z` suffix, but older payloads carried
/// naive date-times; those are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Render a card timestamp, e.g. `1st April 2021 - 9:30 PM UTC`.
///
/// Absent or unparseable timestamps render as [`UNKNOWN_TIME`] rather than
/// poisoning the card with a parse artifact.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_TIME.to_string();
    };
    let Some(at) = parse_timestamp(raw) else {
        return UNKNOWN_TIME.to_string();
    };
    let day = at.day();
    format!(
        "{day}{} {} UTC",
        day_suffix(day),
        at.format("%B %Y - %-l:%M %p")
    )
}

/// Ordinal suffix for a day of month. 11 through 13 are always `th`.
pub fn day_suffix(day: u32) -> &'static str {
    if matches!(day, 11..=13) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
