use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftError};

/// Semantic role a table column can play for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Vehicle code identifying the fleet unit.
    Vehicle,
    /// Full date + time the trip started.
    StartTime,
    /// Time of day (or full timestamp) the trip stopped.
    StopTime,
    /// Activity category label; only the trip label is kept.
    ActivityType,
    /// Distance travelled. Optional.
    Distance,
}

impl ColumnRole {
    /// Roles that must resolve for a table to be processed.
    pub const REQUIRED: [ColumnRole; 4] = [
        ColumnRole::Vehicle,
        ColumnRole::StartTime,
        ColumnRole::StopTime,
        ColumnRole::ActivityType,
    ];

    /// Every role, required ones first.
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Vehicle,
        ColumnRole::StartTime,
        ColumnRole::StopTime,
        ColumnRole::ActivityType,
        ColumnRole::Distance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Vehicle => "vehicle",
            ColumnRole::StartTime => "start_time",
            ColumnRole::StopTime => "stop_time",
            ColumnRole::ActivityType => "activity_type",
            ColumnRole::Distance => "distance",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, ColumnRole::Distance)
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed activity row that passed field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Vehicle code, trimmed.
    pub vehicle: String,
    /// Naive local wall-clock start.
    pub start: NaiveDateTime,
    /// Naive local wall-clock stop.
    pub stop: NaiveDateTime,
    /// Raw activity label as it appeared in the source.
    pub activity: String,
    /// Distance travelled, never negative.
    pub distance: f64,
}

impl TripRecord {
    /// Whole seconds between start and stop (negative when inverted).
    pub fn duration_seconds(&self) -> i64 {
        (self.stop - self.start).num_seconds()
    }

    /// Calendar date the trip is attributed to.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Whether the activity label is `label`, ignoring case and padding.
    pub fn is_trip(&self, label: &str) -> bool {
        is_trip_label(&self.activity, label)
    }
}

/// Case-insensitive comparison of a raw activity cell against the trip label.
pub fn is_trip_label(activity: &str, label: &str) -> bool {
    activity.trim().to_lowercase() == label.trim().to_lowercase()
}

/// Before/after-boundary decomposition of one trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub seconds_before: i64,
    pub seconds_after: i64,
    pub distance_before: f64,
    pub distance_after: f64,
}

impl Split {
    pub fn total_seconds(&self) -> i64 {
        self.seconds_before + self.seconds_after
    }

    pub fn total_distance(&self) -> f64 {
        self.distance_before + self.distance_after
    }
}

/// Trip-level engine output: the split plus the keys it aggregates under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSplit {
    pub vehicle: String,
    /// Start date of the originating trip.
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub split: Split,
}

// ── Period ────────────────────────────────────────────────────────────────────

/// A week or month rollup window, identified by its first calendar day.
///
/// Weeks follow ISO-8601: they start on Monday and belong to the ISO year of
/// their Thursday, so `2024-12-30` is the first day of `2025-W01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Week(NaiveDate),
    Month(NaiveDate),
}

impl Period {
    /// The ISO week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let offset = Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Period::Week(date.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN))
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month(date.with_day(1).unwrap_or(date))
    }

    /// Parse an ISO week selector of the form `YYYY-Www` (e.g. `2025-W07`).
    pub fn parse_week(s: &str) -> Result<Self> {
        let invalid = || ShiftError::InvalidPeriod(format!("{s} (expected YYYY-Www)"));
        let (year, week) = s.trim().split_once('-').ok_or_else(invalid)?;
        let week = week
            .strip_prefix('W')
            .or_else(|| week.strip_prefix('w'))
            .ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
            .map(Period::Week)
            .ok_or_else(invalid)
    }

    /// Parse a month selector of the form `YYYY-MM`.
    pub fn parse_month(s: &str) -> Result<Self> {
        let invalid = || ShiftError::InvalidPeriod(format!("{s} (expected YYYY-MM)"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Period::Month)
            .ok_or_else(invalid)
    }

    pub fn first_day(&self) -> NaiveDate {
        match self {
            Period::Week(start) | Period::Month(start) => *start,
        }
    }

    /// Last calendar day, clamped to [`NaiveDate::MAX`].
    pub fn last_day(&self) -> NaiveDate {
        let last = match self {
            Period::Week(start) => start.checked_add_signed(Duration::days(6)),
            Period::Month(start) => start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt()),
        };
        last.unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Display key: `2025-W52` for weeks, `2025-12` for months.
    pub fn key(&self) -> String {
        match self {
            Period::Week(start) => {
                let iso = start.iso_week();
                format!("{:04}-W{:02}", iso.year(), iso.week())
            }
            Period::Month(start) => start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
