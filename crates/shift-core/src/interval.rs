//! Splitting of time intervals around a daily boundary hour.
//!
//! Every calendar day is cut at `H:00:00`. Time from the start of a walk up to
//! the boundary counts as *before*; time from the boundary up to the next
//! day's boundary counts as *after*. A trip that crosses midnight therefore
//! keeps counting as *after* until the following boundary is reached.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftError};

/// Default boundary hour (20:00).
pub const DEFAULT_BOUNDARY_HOUR: u32 = 20;

// ── Boundary ──────────────────────────────────────────────────────────────────

/// A validated hour-of-day at which durations are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    hour: u32,
}

impl Boundary {
    /// Build a boundary at `hour:00:00`; `hour` must be in `0..=23`.
    pub fn at_hour(hour: u32) -> Result<Self> {
        if hour > 23 {
            return Err(ShiftError::InvalidBoundaryHour(hour));
        }
        Ok(Self { hour })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// The boundary instant on `date`.
    pub fn instant_on(&self, date: NaiveDate) -> NaiveDateTime {
        NaiveDateTime::new(date, NaiveTime::MIN) + Duration::hours(i64::from(self.hour))
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            hour: DEFAULT_BOUNDARY_HOUR,
        }
    }
}

// ── Segments ──────────────────────────────────────────────────────────────────

/// Which side of the boundary a segment lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

/// A maximal run of an interval that stays on one side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub side: Side,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Segment {
    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Iterator walking `[start, end)` one segment at a time.
///
/// Each step looks at the boundary on the current position's date: before it,
/// the segment runs up to that boundary; at or after it, the segment runs up
/// to the next day's boundary. Both are clipped to `end`.
#[derive(Debug, Clone)]
pub struct Segments {
    cur: NaiveDateTime,
    end: NaiveDateTime,
    boundary: Boundary,
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.cur >= self.end {
            return None;
        }

        let boundary_at = self.boundary.instant_on(self.cur.date());
        let (side, seg_end) = if self.cur < boundary_at {
            (Side::Before, self.end.min(boundary_at))
        } else {
            // Past the last representable boundary the segment runs to `end`.
            let next = boundary_at
                .checked_add_signed(Duration::days(1))
                .map_or(self.end, |b| self.end.min(b));
            (Side::After, next)
        };

        let segment = Segment {
            side,
            start: self.cur,
            end: seg_end,
        };
        self.cur = seg_end;
        Some(segment)
    }
}

/// Segments of `[start, end)`. Empty when `end <= start`.
pub fn segments(start: NaiveDateTime, end: NaiveDateTime, boundary: Boundary) -> Segments {
    Segments {
        cur: start,
        end,
        boundary,
    }
}

/// Return `(seconds_before, seconds_after)` for `[start, end)`.
///
/// The two values always sum to the interval length; an empty or inverted
/// interval yields `(0, 0)`.
pub fn split_interval(start: NaiveDateTime, end: NaiveDateTime, boundary: Boundary) -> (i64, i64) {
    segments(start, end, boundary).fold((0, 0), |(before, after), seg| match seg.side {
        Side::Before => (before + seg.seconds(), after),
        Side::After => (before, after + seg.seconds()),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
