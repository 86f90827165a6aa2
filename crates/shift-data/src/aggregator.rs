//! Activity aggregation over days, ISO weeks, months and vehicles.
//!
//! Trips fold into per-vehicle day buckets keyed by the trip's start date;
//! days then roll up into week and month buckets. The vehicle code is carried
//! through every level, so totals never mix vehicles.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use shift_core::models::{Period, Split, TripSplit};

// ── ActivityTotals ────────────────────────────────────────────────────────────

/// The four split fields summed over any number of trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActivityTotals {
    pub seconds_before: i64,
    pub seconds_after: i64,
    pub distance_before: f64,
    pub distance_after: f64,
    /// Number of trips folded in.
    pub trips: u32,
}

impl ActivityTotals {
    /// Add one trip's split to the running totals.
    pub fn add_split(&mut self, split: &Split) {
        self.seconds_before += split.seconds_before;
        self.seconds_after += split.seconds_after;
        self.distance_before += split.distance_before;
        self.distance_after += split.distance_after;
        self.trips += 1;
    }

    /// Add another set of totals field by field.
    pub fn merge(&mut self, other: &ActivityTotals) {
        self.seconds_before += other.seconds_before;
        self.seconds_after += other.seconds_after;
        self.distance_before += other.distance_before;
        self.distance_after += other.distance_after;
        self.trips += other.trips;
    }

    pub fn total_seconds(&self) -> i64 {
        self.seconds_before + self.seconds_after
    }

    pub fn total_distance(&self) -> f64 {
        self.distance_before + self.distance_after
    }
}

// ── Aggregate levels ──────────────────────────────────────────────────────────

/// Totals for one vehicle on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAggregate {
    pub vehicle: String,
    pub date: NaiveDate,
    pub totals: ActivityTotals,
}

impl DayAggregate {
    fn new(vehicle: &str, date: NaiveDate) -> Self {
        Self {
            vehicle: vehicle.to_string(),
            date,
            totals: ActivityTotals::default(),
        }
    }
}

/// Totals for one vehicle over one week or month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub vehicle: String,
    pub period: Period,
    pub totals: ActivityTotals,
    /// Number of day aggregates folded in.
    pub days: u32,
}

/// Totals for one vehicle across every day in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub vehicle: String,
    pub totals: ActivityTotals,
    pub days: u32,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups trip splits by vehicle and time period.
pub struct ActivityAggregator;

impl ActivityAggregator {
    /// Fold trips into one aggregate per `(vehicle, start date)`.
    ///
    /// Returns aggregates sorted by vehicle, then date.
    pub fn aggregate_daily(trips: &[TripSplit]) -> Vec<DayAggregate> {
        let mut map: BTreeMap<(String, NaiveDate), DayAggregate> = BTreeMap::new();

        for trip in trips {
            map.entry((trip.vehicle.clone(), trip.date))
                .or_insert_with(|| DayAggregate::new(&trip.vehicle, trip.date))
                .totals
                .add_split(&trip.split);
        }

        map.into_values().collect()
    }

    /// Roll day aggregates into ISO weeks.
    ///
    /// Returns aggregates sorted by vehicle, then week.
    pub fn aggregate_weekly(days: &[DayAggregate]) -> Vec<PeriodAggregate> {
        Self::aggregate_by_period(days, Period::week_of)
    }

    /// Roll day aggregates into calendar months.
    ///
    /// Returns aggregates sorted by vehicle, then month.
    pub fn aggregate_monthly(days: &[DayAggregate]) -> Vec<PeriodAggregate> {
        Self::aggregate_by_period(days, Period::month_of)
    }

    /// Roll day aggregates into one summary per vehicle.
    pub fn summarize_vehicles(days: &[DayAggregate]) -> Vec<VehicleSummary> {
        let mut map: BTreeMap<String, VehicleSummary> = BTreeMap::new();

        for day in days {
            let summary = map
                .entry(day.vehicle.clone())
                .or_insert_with(|| VehicleSummary {
                    vehicle: day.vehicle.clone(),
                    totals: ActivityTotals::default(),
                    days: 0,
                    first_date: day.date,
                    last_date: day.date,
                });
            summary.totals.merge(&day.totals);
            summary.days += 1;
            summary.first_date = summary.first_date.min(day.date);
            summary.last_date = summary.last_date.max(day.date);
        }

        map.into_values().collect()
    }

    /// Sum every day aggregate, across vehicles, into one set of totals.
    pub fn calculate_totals(days: &[DayAggregate]) -> ActivityTotals {
        let mut totals = ActivityTotals::default();
        for day in days {
            totals.merge(&day.totals);
        }
        totals
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic rollup driver. `period_fn` maps a day to its enclosing period.
    fn aggregate_by_period(
        days: &[DayAggregate],
        period_fn: impl Fn(NaiveDate) -> Period,
    ) -> Vec<PeriodAggregate> {
        let mut map: BTreeMap<(String, Period), PeriodAggregate> = BTreeMap::new();

        for day in days {
            let period = period_fn(day.date);
            let agg = map
                .entry((day.vehicle.clone(), period))
                .or_insert_with(|| PeriodAggregate {
                    vehicle: day.vehicle.clone(),
                    period,
                    totals: ActivityTotals::default(),
                    days: 0,
                });
            agg.totals.merge(&day.totals);
            agg.days += 1;
        }

        map.into_values().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
