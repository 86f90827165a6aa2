use chrono::{Duration, NaiveDateTime, NaiveTime};
use tracing::trace;

/// Date + time formats tried in order. Year-first layouts come first so that
/// ISO-style exports never fall through to a day-first interpretation.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Time-of-day formats for stop cells that carry no date.
pub const CLOCK_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

// ── ValueParser ───────────────────────────────────────────────────────────────

/// Converts raw table cells into typed values.
///
/// Every method returns `None` for input it cannot interpret; deciding what
/// to do with the row is left to the caller.
#[derive(Debug, Clone)]
pub struct ValueParser {
    timestamp_formats: Vec<String>,
}

impl Default for ValueParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl ValueParser {
    pub fn new(timestamp_formats: Vec<String>) -> Self {
        Self { timestamp_formats }
    }

    pub fn timestamp_formats(&self) -> &[String] {
        &self.timestamp_formats
    }

    /// Parse a full date + time cell using the first matching format.
    pub fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        let parsed = self
            .timestamp_formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok());
        if parsed.is_none() {
            trace!("no timestamp format matched {:?}", s);
        }
        parsed
    }

    /// Parse a stop cell relative to the trip's `start`.
    ///
    /// A full timestamp is taken as-is. A bare time of day is placed on the
    /// start's calendar date, rolling over to the next day when it would
    /// otherwise precede the start.
    pub fn parse_stop(&self, raw: &str, start: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(ts) = self.parse_timestamp(raw) {
            return Some(ts);
        }
        parse_clock_time(raw).and_then(|time| combine_with_start(time, start))
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Parse `HH:MM:SS`, then `HH:MM`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Place `time` on `start`'s date, adding a day if the result precedes `start`.
///
/// Returns `None` when the rollover would leave the representable calendar.
pub fn combine_with_start(time: NaiveTime, start: NaiveDateTime) -> Option<NaiveDateTime> {
    let stop = NaiveDateTime::new(start.date(), time);
    if stop < start {
        stop.checked_add_signed(Duration::days(1))
    } else {
        Some(stop)
    }
}

/// Parse a distance cell, accepting a comma decimal separator and stray
/// whitespace (`" 1 234,5 "` → `1234.5`).
///
/// Returns `None` for empty, unparsable, non-finite or negative input.
pub fn try_parse_distance(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Like [`try_parse_distance`] but falls back to `0.0`.
pub fn parse_distance(raw: &str) -> f64 {
    try_parse_distance(raw).unwrap_or(0.0)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
