use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};

use crate::error::{Result, TrackError};

/// Fixed GPX time layout, e.g. `2014-04-01T10:15:30Z`.
pub const GPX_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an ISO-8601 UTC timestamp into an absolute instant.
///
/// The fixed `Z` layout is tried first; anything else RFC 3339 accepts
/// (fractional seconds, explicit offsets) is converted to UTC. Instants are
/// truncated to whole seconds so differences between them add up exactly.
pub fn parse_utc(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, GPX_TIME_FORMAT) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(0))
        .map_err(|e| TrackError::MalformedInput(format!("bad timestamp '{}': {}", text, e)))
}

/// Whole seconds from `start` to `end`; negative when `end` is earlier.
pub fn seconds_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
    end.signed_duration_since(*start).num_seconds()
}

/// Render seconds as `m:ss`, keeping the sign for negative spans.
pub fn clock_time(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}
