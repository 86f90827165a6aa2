//! Analysis pipeline from raw tables to split trips and day aggregates.
//!
//! Column resolution is fatal for the whole batch. Row-level defects never
//! raise; they are tallied in [`SkipStats`] and reported alongside the
//! results.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use shift_core::allocation::TripSplitter;
use shift_core::config::EngineConfig;
use shift_core::error::Result;
use shift_core::models::{is_trip_label, TripRecord, TripSplit};
use shift_core::value_parser::{try_parse_distance, ValueParser};
use tracing::{debug, info, warn};

use crate::aggregator::{ActivityAggregator, DayAggregate};
use crate::columns::{resolve_columns, ResolvedColumns};
use crate::reader::{cell, is_blank_row, RawTable};

// ── Skip accounting ───────────────────────────────────────────────────────────

/// Why a row was excluded from splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    /// Vehicle, start, stop or activity cell is empty.
    MissingField,
    UnparsableStart,
    UnparsableStop,
    /// Activity label is not the configured trip label.
    NotTrip,
    /// Stop is not after start.
    NonPositiveDuration,
}

/// Counts of excluded rows by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipStats {
    pub blank_rows: usize,
    pub missing_field: usize,
    pub unparsable_start: usize,
    pub unparsable_stop: usize,
    pub not_trip: usize,
    pub non_positive_duration: usize,
    /// Accepted rows whose non-empty distance cell could not be parsed and
    /// counted as zero. Not part of [`SkipStats::total`].
    pub distance_defaulted: usize,
}

impl SkipStats {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Blank => self.blank_rows += 1,
            SkipReason::MissingField => self.missing_field += 1,
            SkipReason::UnparsableStart => self.unparsable_start += 1,
            SkipReason::UnparsableStop => self.unparsable_stop += 1,
            SkipReason::NotTrip => self.not_trip += 1,
            SkipReason::NonPositiveDuration => self.non_positive_duration += 1,
        }
    }

    pub fn merge(&mut self, other: &SkipStats) {
        self.blank_rows += other.blank_rows;
        self.missing_field += other.missing_field;
        self.unparsable_start += other.unparsable_start;
        self.unparsable_stop += other.unparsable_stop;
        self.not_trip += other.not_trip;
        self.non_positive_duration += other.non_positive_duration;
        self.distance_defaulted += other.distance_defaulted;
    }

    /// Rows excluded for any reason other than being a non-trip activity.
    pub fn defective(&self) -> usize {
        self.missing_field + self.unparsable_start + self.unparsable_stop + self.non_positive_duration
    }

    /// Every excluded row, including blank and non-trip rows.
    pub fn total(&self) -> usize {
        self.blank_rows + self.not_trip + self.defective()
    }
}

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub tables_read: usize,
    /// Data rows seen across all tables, blank ones included.
    pub rows_read: usize,
    pub trips_accepted: usize,
    pub days_created: usize,
    /// Wall-clock seconds spent parsing and splitting rows.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent folding trips into days.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_tables`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Accepted trips in input order.
    pub trips: Vec<TripSplit>,
    /// Day aggregates sorted by vehicle, then date.
    pub days: Vec<DayAggregate>,
    pub skipped: SkipStats,
    pub metadata: AnalysisMetadata,
}

// ── RowParser ─────────────────────────────────────────────────────────────────

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub record: TripRecord,
    /// The distance cell was non-empty but unusable and counted as zero.
    pub distance_defaulted: bool,
}

/// Turns raw rows of one table into [`TripRecord`]s.
pub struct RowParser<'a> {
    columns: &'a ResolvedColumns,
    values: ValueParser,
    trip_label: &'a str,
}

impl<'a> RowParser<'a> {
    pub fn new(columns: &'a ResolvedColumns, config: &'a EngineConfig) -> Self {
        Self {
            columns,
            values: config.value_parser(),
            trip_label: &config.trip_label,
        }
    }

    /// Validate one row.
    ///
    /// Checks run in a fixed order: blank row, empty required cell, activity
    /// label, start, stop, duration.
    pub fn parse(&self, row: &[String]) -> std::result::Result<ParsedRow, SkipReason> {
        if is_blank_row(row) {
            return Err(SkipReason::Blank);
        }

        let vehicle = cell(row, self.columns.vehicle).trim();
        let start_raw = cell(row, self.columns.start_time).trim();
        let stop_raw = cell(row, self.columns.stop_time).trim();
        let activity = cell(row, self.columns.activity_type).trim();
        if vehicle.is_empty() || start_raw.is_empty() || stop_raw.is_empty() || activity.is_empty()
        {
            return Err(SkipReason::MissingField);
        }

        if !is_trip_label(activity, self.trip_label) {
            return Err(SkipReason::NotTrip);
        }

        let start = self
            .values
            .parse_timestamp(start_raw)
            .ok_or(SkipReason::UnparsableStart)?;
        let stop = self
            .values
            .parse_stop(stop_raw, start)
            .ok_or(SkipReason::UnparsableStop)?;
        let distance_raw = self
            .columns
            .distance
            .map(|idx| cell(row, idx).trim())
            .unwrap_or("");
        let parsed_distance = try_parse_distance(distance_raw);
        let distance_defaulted = !distance_raw.is_empty() && parsed_distance.is_none();

        let record = TripRecord {
            vehicle: vehicle.to_string(),
            start,
            stop,
            activity: activity.to_string(),
            distance: parsed_distance.unwrap_or(0.0),
        };
        if record.duration_seconds() <= 0 {
            return Err(SkipReason::NonPositiveDuration);
        }

        Ok(ParsedRow {
            record,
            distance_defaulted,
        })
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over a single table.
pub fn analyze_table(table: &RawTable, config: &EngineConfig) -> Result<AnalysisResult> {
    analyze_tables(std::slice::from_ref(table), config)
}

/// Run the full pipeline over several tables and merge the results.
///
/// 1. Resolve columns for every table; any failure aborts the batch.
/// 2. Parse, filter and split each row.
/// 3. Fold all accepted trips into day aggregates.
pub fn analyze_tables(tables: &[RawTable], config: &EngineConfig) -> Result<AnalysisResult> {
    // ── Step 1: Columns ───────────────────────────────────────────────────────
    let resolved: Vec<ResolvedColumns> = tables
        .iter()
        .map(|t| resolve_columns(&t.headers))
        .collect::<Result<_>>()?;

    // ── Step 2: Rows ──────────────────────────────────────────────────────────
    let parse_start = Instant::now();
    let splitter = TripSplitter::new(config.boundary);
    let mut trips = Vec::new();
    let mut skipped = SkipStats::default();
    let mut rows_read = 0usize;

    for (table, columns) in tables.iter().zip(resolved.iter()) {
        let stats = split_table(table, columns, config, &splitter, &mut trips);
        rows_read += table.rows.len();
        skipped.merge(&stats);
    }
    let parse_time = parse_start.elapsed().as_secs_f64();

    // ── Step 3: Days ──────────────────────────────────────────────────────────
    let aggregate_start = Instant::now();
    let days = ActivityAggregator::aggregate_daily(&trips);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    if skipped.defective() > 0 {
        warn!(
            "Skipped {} malformed row(s): {} missing field, {} bad start, {} bad stop, {} non-positive duration",
            skipped.defective(),
            skipped.missing_field,
            skipped.unparsable_start,
            skipped.unparsable_stop,
            skipped.non_positive_duration
        );
    }
    if skipped.distance_defaulted > 0 {
        warn!(
            "{} trip(s) had an unreadable distance and were counted as 0 km",
            skipped.distance_defaulted
        );
    }
    info!(
        "Accepted {} trip(s) from {} row(s) into {} vehicle-day(s)",
        trips.len(),
        rows_read,
        days.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        tables_read: tables.len(),
        rows_read,
        trips_accepted: trips.len(),
        days_created: days.len(),
        parse_time_seconds: parse_time,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(AnalysisResult {
        trips,
        days,
        skipped,
        metadata,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Parse and split every row of `table`, appending accepted trips to `out`.
fn split_table(
    table: &RawTable,
    columns: &ResolvedColumns,
    config: &EngineConfig,
    splitter: &TripSplitter,
    out: &mut Vec<TripSplit>,
) -> SkipStats {
    let parser = RowParser::new(columns, config);
    let mut stats = SkipStats::default();

    for (idx, row) in table.rows.iter().enumerate() {
        match parser.parse(row) {
            Ok(parsed) => {
                if parsed.distance_defaulted {
                    stats.distance_defaulted += 1;
                }
                let record = parsed.record;
                out.push(TripSplit {
                    vehicle: record.vehicle.clone(),
                    date: record.start_date(),
                    start: record.start,
                    stop: record.stop,
                    split: splitter.split(&record),
                });
            }
            Err(reason) => {
                if !matches!(reason, SkipReason::Blank | SkipReason::NotTrip) {
                    debug!("{}: row {} skipped ({:?})", table.label(), idx + 1, reason);
                }
                stats.record(reason);
            }
        }
    }

    stats
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use shift_core::error::ShiftError;
    use shift_core::models::ColumnRole;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            strings(&["Code", "Heure de départ", "Heure d'arrêt", "CAA", "KM"]),
            rows.iter().map(|r| strings(r)).collect(),
        )
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn test_transit_rows_contribute_nothing() {
        let t = table(&[
            &["C024", "2025-12-25 19:00:00", "21:00:00", "Transit", "10"],
            &["C024", "2025-12-25 08:00:00", "10:32:00", "course", "2,53"],
        ]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();

        assert_eq!(result.trips.len(), 1);
        assert_eq!(result.skipped.not_trip, 1);
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].totals.seconds_before, 9120);
        assert_eq!(result.days[0].totals.seconds_after, 0);
        assert!((result.days[0].totals.distance_before - 2.53).abs() < 1e-9);
    }

    #[test]
    fn test_missing_stop_column_is_structural_error() {
        let t = RawTable::new(
            strings(&["Code", "Heure de départ", "CAA", "KM"]),
            vec![strings(&["C024", "2025-12-25 08:00:00", "course", "1"])],
        );
        let err = analyze_table(&t, &EngineConfig::default()).unwrap_err();
        match err {
            ShiftError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec![ColumnRole::StopTime]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overnight_trip_with_clock_stop() {
        let t = table(&[&["C024", "2025-12-25 18:00:00", "10:00:00", "Course", "50"]]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();

        let split = result.trips[0].split;
        assert_eq!(split.seconds_before, 7200);
        assert_eq!(split.seconds_after, 50400);
        assert!((split.distance_before - 6.25).abs() < 1e-9);
        assert!((split.distance_after - 43.75).abs() < 1e-9);
        assert_eq!(result.trips[0].date.to_string(), "2025-12-25");
    }

    // ── Skip accounting ───────────────────────────────────────────────────────

    #[test]
    fn test_skip_reasons_are_counted() {
        let t = table(&[
            &["", "", "", "", ""],
            &["", "2025-12-25 08:00:00", "09:00", "course", "1"],
            &["C024", "yesterday", "09:00", "course", "1"],
            &["C024", "2025-12-25 08:00:00", "late", "course", "1"],
            &["C024", "2025-12-25 08:00:00", "2025-12-25 08:00:00", "course", "1"],
            &["C024", "2025-12-25 08:00:00", "09:00", "pause", "1"],
            &["C024", "2025-12-25 08:00:00", "09:00", "course", "1"],
        ]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();
        let s = result.skipped;

        assert_eq!(s.blank_rows, 1);
        assert_eq!(s.missing_field, 1);
        assert_eq!(s.unparsable_start, 1);
        assert_eq!(s.unparsable_stop, 1);
        assert_eq!(s.non_positive_duration, 1);
        assert_eq!(s.not_trip, 1);
        assert_eq!(s.defective(), 4);
        assert_eq!(s.total(), 6);
        assert_eq!(result.trips.len(), 1);
        assert_eq!(result.metadata.rows_read, 7);
        assert_eq!(result.metadata.trips_accepted, 1);
    }

    #[test]
    fn test_bad_distance_defaults_to_zero() {
        let t = table(&[
            &["C024", "2025-12-25 08:00:00", "09:00", "course", "n/a"],
            &["C024", "2025-12-25 10:00:00", "11:00", "course", ""],
            &["C024", "2025-12-25 12:00:00", "13:00", "course", "-4"],
        ]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();

        assert_eq!(result.trips.len(), 3);
        assert_eq!(result.skipped.distance_defaulted, 2);
        assert_eq!(result.skipped.total(), 0);
        assert_eq!(result.days[0].totals.total_distance(), 0.0);
        assert_eq!(result.days[0].totals.seconds_before, 3 * 3600);
    }

    #[test]
    fn test_table_without_distance_column() {
        let t = RawTable::new(
            strings(&["Vehicle", "Start time", "Stop time", "Activity"]),
            vec![strings(&["V1", "2025-12-25 19:00", "2025-12-25 21:00", "course"])],
        );
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();

        assert_eq!(result.trips[0].split.seconds_before, 3600);
        assert_eq!(result.trips[0].split.seconds_after, 3600);
        assert_eq!(result.trips[0].split.total_distance(), 0.0);
        assert_eq!(result.skipped.distance_defaulted, 0);
    }

    #[test]
    fn test_short_rows_count_as_missing_field() {
        let t = table(&[&["C024", "2025-12-25 08:00:00"]]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();
        assert_eq!(result.skipped.missing_field, 1);
        assert!(result.trips.is_empty());
    }

    #[test]
    fn test_rows_at_calendar_end_do_not_abort_batch() {
        let last_day = chrono::NaiveDate::MAX.to_string();
        let late = format!("{last_day} 21:00:00");
        let rollover = format!("{last_day} 23:00:00");
        let t = table(&[
            &["C1", late.as_str(), "23:30", "course", "1"],
            &["C1", rollover.as_str(), "01:00", "course", "1"],
            &["C024", "2025-12-25 08:00:00", "09:00", "course", "1"],
        ]);
        let result = analyze_table(&t, &EngineConfig::default()).unwrap();

        assert_eq!(result.trips.len(), 2);
        assert_eq!(result.trips[0].split.seconds_after, 9000);
        assert_eq!(result.skipped.unparsable_stop, 1);
        assert_eq!(result.days.len(), 2);
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    #[test]
    fn test_custom_trip_label_and_boundary() {
        let config = EngineConfig::new(18, "delivery", &[]).unwrap();
        let t = table(&[
            &["C024", "2025-12-25 17:00:00", "19:00", "DELIVERY", "4"],
            &["C024", "2025-12-25 17:00:00", "19:00", "course", "4"],
        ]);
        let result = analyze_table(&t, &config).unwrap();

        assert_eq!(result.trips.len(), 1);
        assert_eq!(result.trips[0].split.seconds_before, 3600);
        assert_eq!(result.trips[0].split.seconds_after, 3600);
        assert_eq!(result.skipped.not_trip, 1);
    }

    #[test]
    fn test_extra_timestamp_format() {
        let config = EngineConfig::new(20, "course", &["%d.%m.%Y %H:%M".to_string()]).unwrap();
        let t = table(&[&["C024", "25.12.2025 19:00", "21:00", "course", "10"]]);
        let result = analyze_table(&t, &config).unwrap();
        assert_eq!(result.trips.len(), 1);

        let default = analyze_table(&t, &EngineConfig::default()).unwrap();
        assert_eq!(default.skipped.unparsable_start, 1);
    }

    // ── analyze_tables ────────────────────────────────────────────────────────

    #[test]
    fn test_multiple_tables_merge() {
        let a = table(&[&["C024", "2025-12-25 08:00:00", "09:00", "course", "1"]]);
        let b = RawTable::new(
            strings(&["KM", "CAA", "HEURE ARRET", "HEURE DEPART", "CODE"]),
            vec![
                strings(&["3", "course", "10:00", "2025-12-25 09:00:00", "C024"]),
                strings(&["", "", "", "", ""]),
            ],
        );
        let result = analyze_tables(&[a, b], &EngineConfig::default()).unwrap();

        assert_eq!(result.metadata.tables_read, 2);
        assert_eq!(result.metadata.rows_read, 3);
        assert_eq!(result.trips.len(), 2);
        assert_eq!(result.skipped.blank_rows, 1);
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].totals.trips, 2);
        assert!((result.days[0].totals.total_distance() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_bad_table_fails_the_batch() {
        let good = table(&[&["C024", "2025-12-25 08:00:00", "09:00", "course", "1"]]);
        let bad = RawTable::new(strings(&["foo"]), vec![]);
        assert!(analyze_tables(&[good, bad], &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_empty_input() {
        let result = analyze_tables(&[], &EngineConfig::default()).unwrap();
        assert!(result.trips.is_empty());
        assert!(result.days.is_empty());
        assert_eq!(result.skipped, SkipStats::default());
    }
}
