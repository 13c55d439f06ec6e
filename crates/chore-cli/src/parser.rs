use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a due date as RFC 3339 or natural language ("tomorrow", "next friday 9am"),
/// reading relative expressions against the wall clock of `now`.
pub fn parse_due_date<Tz>(date_str: &str, now: DateTime<Tz>) -> Result<DateTime<Utc>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_date_string(date_str, now, Dialect::Us)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow::anyhow!("Failed to parse due date '{}': {}", date_str, e))
}
