use crate::interval::{split_interval, Boundary};
use crate::models::{Split, TripRecord};

/// Apportion `distance` between the two buckets in proportion to time.
///
/// Assumes uniform speed over the trip. Returns `(0.0, 0.0)` when the total
/// duration is zero.
pub fn allocate_distance(distance: f64, seconds_before: i64, seconds_after: i64) -> (f64, f64) {
    let total = seconds_before + seconds_after;
    if total <= 0 {
        return (0.0, 0.0);
    }
    let total = total as f64;
    (
        distance * seconds_before as f64 / total,
        distance * seconds_after as f64 / total,
    )
}

// ── TripSplitter ──────────────────────────────────────────────────────────────

/// Splits trips at a configured boundary hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripSplitter {
    boundary: Boundary,
}

impl TripSplitter {
    pub fn new(boundary: Boundary) -> Self {
        Self { boundary }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Partition `trip`'s duration and distance around the boundary.
    ///
    /// Callers are expected to have dropped trips with `stop <= start`; such
    /// a trip yields an all-zero [`Split`].
    pub fn split(&self, trip: &TripRecord) -> Split {
        let (seconds_before, seconds_after) = split_interval(trip.start, trip.stop, self.boundary);
        let (distance_before, distance_after) =
            allocate_distance(trip.distance, seconds_before, seconds_after);
        Split {
            seconds_before,
            seconds_after,
            distance_before,
            distance_after,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
