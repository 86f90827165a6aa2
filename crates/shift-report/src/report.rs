//! Report building and persistence.
//!
//! Turns an [`AnalysisResult`] into rows for one report level, optionally
//! narrowed to a single day, ISO week or month, and writes them as CSV or
//! JSON. Rounding happens here and nowhere upstream.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use csv::WriterBuilder;
use serde::Serialize;
use shift_core::error::{Result, ShiftError};
use shift_core::formatting::{round_distance, seconds_to_hhmm, seconds_to_hours};
use shift_core::models::Period;
use shift_data::aggregator::{ActivityAggregator, ActivityTotals, DayAggregate};
use shift_data::analysis::{AnalysisResult, SkipStats};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── ReportLevel / OutputFormat ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Trips,
    Daily,
    Weekly,
    Monthly,
    Vehicles,
}

impl ReportLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportLevel::Trips => "trips",
            ReportLevel::Daily => "daily",
            ReportLevel::Weekly => "weekly",
            ReportLevel::Monthly => "monthly",
            ReportLevel::Vehicles => "vehicles",
        }
    }
}

impl FromStr for ReportLevel {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trips" => Ok(ReportLevel::Trips),
            "daily" => Ok(ReportLevel::Daily),
            "weekly" => Ok(ReportLevel::Weekly),
            "monthly" => Ok(ReportLevel::Monthly),
            "vehicles" => Ok(ReportLevel::Vehicles),
            other => Err(ShiftError::Config(format!("unknown report level: {other}"))),
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ShiftError::Config(format!("unknown output format: {other}"))),
        }
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Narrows a report to one day, ISO week or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Date(NaiveDate),
    Period(Period),
}

impl Selection {
    /// Build a selection from the `--date`, `--week` and `--month` values.
    ///
    /// At most one is expected; if several are given, date wins over week
    /// and week over month.
    pub fn from_args(
        date: Option<&str>,
        week: Option<&str>,
        month: Option<&str>,
    ) -> Result<Option<Self>> {
        if let Some(raw) = date {
            let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| ShiftError::InvalidPeriod(format!("{raw} (expected YYYY-MM-DD)")))?;
            return Ok(Some(Selection::Date(day)));
        }
        if let Some(raw) = week {
            return Period::parse_week(raw).map(|p| Some(Selection::Period(p)));
        }
        if let Some(raw) = month {
            return Period::parse_month(raw).map(|p| Some(Selection::Period(p)));
        }
        Ok(None)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Selection::Date(day) => *day == date,
            Selection::Period(period) => period.contains(date),
        }
    }

    /// `2025-12-25`, `2025-W52` or `2025-12`.
    pub fn key(&self) -> String {
        match self {
            Selection::Date(day) => day.format("%Y-%m-%d").to_string(),
            Selection::Period(period) => period.key(),
        }
    }
}

// ── Row shapes ────────────────────────────────────────────────────────────────

/// Rounded presentation of an [`ActivityTotals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measures {
    pub hours_before: f64,
    pub hours_after: f64,
    pub time_before_hhmm: String,
    pub time_after_hhmm: String,
    pub distance_before: f64,
    pub distance_after: f64,
    pub trips: u32,
}

impl From<&ActivityTotals> for Measures {
    fn from(t: &ActivityTotals) -> Self {
        Self {
            hours_before: seconds_to_hours(t.seconds_before),
            hours_after: seconds_to_hours(t.seconds_after),
            time_before_hhmm: seconds_to_hhmm(t.seconds_before),
            time_after_hhmm: seconds_to_hhmm(t.seconds_after),
            distance_before: round_distance(t.distance_before),
            distance_after: round_distance(t.distance_after),
            trips: t.trips,
        }
    }
}

// The csv crate cannot serialize flattened structs, so each row spells out
// the measure columns.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    pub vehicle: String,
    pub date: NaiveDate,
    pub start: String,
    pub stop: String,
    pub seconds_before: i64,
    pub seconds_after: i64,
    pub hours_before: f64,
    pub hours_after: f64,
    pub distance_before: f64,
    pub distance_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub vehicle: String,
    pub hours_before: f64,
    pub hours_after: f64,
    pub time_before_hhmm: String,
    pub time_after_hhmm: String,
    pub distance_before: f64,
    pub distance_after: f64,
    pub trips: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub year_week: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub vehicle: String,
    pub hours_before: f64,
    pub hours_after: f64,
    pub time_before_hhmm: String,
    pub time_after_hhmm: String,
    pub distance_before: f64,
    pub distance_after: f64,
    pub trips: u32,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub year_month: String,
    pub vehicle: String,
    pub hours_before: f64,
    pub hours_after: f64,
    pub time_before_hhmm: String,
    pub time_after_hhmm: String,
    pub distance_before: f64,
    pub distance_after: f64,
    pub trips: u32,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRow {
    pub vehicle: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub hours_before: f64,
    pub hours_after: f64,
    pub time_before_hhmm: String,
    pub time_after_hhmm: String,
    pub distance_before: f64,
    pub distance_after: f64,
    pub trips: u32,
    pub days: u32,
}

/// Rows for one report level.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRows {
    Trips(Vec<TripRow>),
    Daily(Vec<DayRow>),
    Weekly(Vec<WeekRow>),
    Monthly(Vec<MonthRow>),
    Vehicles(Vec<VehicleRow>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            ReportRows::Trips(r) => r.len(),
            ReportRows::Daily(r) => r.len(),
            ReportRows::Weekly(r) => r.len(),
            ReportRows::Monthly(r) => r.len(),
            ReportRows::Vehicles(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// A built report ready to be written.
#[derive(Debug, Clone)]
pub struct Report {
    pub level: ReportLevel,
    pub selection: Option<Selection>,
    pub rows: ReportRows,
    /// Cross-vehicle totals over the selected days.
    pub totals: ActivityTotals,
    pub skipped: SkipStats,
    pub generated_at: String,
}

/// JSON envelope: report metadata, footer totals and rows.
#[derive(Serialize)]
struct JsonReport<'a, T: Serialize> {
    level: &'static str,
    selection: Option<String>,
    generated_at: &'a str,
    skipped: &'a SkipStats,
    totals: Measures,
    rows: &'a [T],
}

/// Build the rows for `level` from `analysis`, restricted to `selection`.
///
/// Fails with [`ShiftError::NoRecords`] when a selection matches no day.
/// Week and month rollups under a selection only see the selected days.
pub fn build_report(
    analysis: &AnalysisResult,
    level: ReportLevel,
    selection: Option<Selection>,
) -> Result<Report> {
    let in_selection = |date: NaiveDate| selection.map_or(true, |s| s.contains(date));

    let days: Vec<DayAggregate> = analysis
        .days
        .iter()
        .filter(|d| in_selection(d.date))
        .cloned()
        .collect();

    if let Some(sel) = selection {
        if days.is_empty() {
            return Err(ShiftError::NoRecords(sel.key()));
        }
        debug!("Selection {} kept {} vehicle-day(s)", sel.key(), days.len());
    }

    let rows = match level {
        ReportLevel::Trips => {
            let mut trips: Vec<_> = analysis
                .trips
                .iter()
                .filter(|t| in_selection(t.date))
                .collect();
            trips.sort_by(|a, b| (&a.vehicle, a.start).cmp(&(&b.vehicle, b.start)));
            ReportRows::Trips(
                trips
                    .into_iter()
                    .map(|t| TripRow {
                        vehicle: t.vehicle.clone(),
                        date: t.date,
                        start: format_timestamp(t.start),
                        stop: format_timestamp(t.stop),
                        seconds_before: t.split.seconds_before,
                        seconds_after: t.split.seconds_after,
                        hours_before: seconds_to_hours(t.split.seconds_before),
                        hours_after: seconds_to_hours(t.split.seconds_after),
                        distance_before: round_distance(t.split.distance_before),
                        distance_after: round_distance(t.split.distance_after),
                    })
                    .collect(),
            )
        }
        ReportLevel::Daily => ReportRows::Daily(
            days.iter()
                .map(|d| {
                    let m = Measures::from(&d.totals);
                    DayRow {
                        date: d.date,
                        vehicle: d.vehicle.clone(),
                        hours_before: m.hours_before,
                        hours_after: m.hours_after,
                        time_before_hhmm: m.time_before_hhmm,
                        time_after_hhmm: m.time_after_hhmm,
                        distance_before: m.distance_before,
                        distance_after: m.distance_after,
                        trips: m.trips,
                    }
                })
                .collect(),
        ),
        ReportLevel::Weekly => ReportRows::Weekly(
            ActivityAggregator::aggregate_weekly(&days)
                .into_iter()
                .map(|w| {
                    let m = Measures::from(&w.totals);
                    WeekRow {
                        year_week: w.period.key(),
                        week_start: w.period.first_day(),
                        week_end: w.period.last_day(),
                        vehicle: w.vehicle,
                        hours_before: m.hours_before,
                        hours_after: m.hours_after,
                        time_before_hhmm: m.time_before_hhmm,
                        time_after_hhmm: m.time_after_hhmm,
                        distance_before: m.distance_before,
                        distance_after: m.distance_after,
                        trips: m.trips,
                        days: w.days,
                    }
                })
                .collect(),
        ),
        ReportLevel::Monthly => ReportRows::Monthly(
            ActivityAggregator::aggregate_monthly(&days)
                .into_iter()
                .map(|p| {
                    let m = Measures::from(&p.totals);
                    MonthRow {
                        year_month: p.period.key(),
                        vehicle: p.vehicle,
                        hours_before: m.hours_before,
                        hours_after: m.hours_after,
                        time_before_hhmm: m.time_before_hhmm,
                        time_after_hhmm: m.time_after_hhmm,
                        distance_before: m.distance_before,
                        distance_after: m.distance_after,
                        trips: m.trips,
                        days: p.days,
                    }
                })
                .collect(),
        ),
        ReportLevel::Vehicles => ReportRows::Vehicles(
            ActivityAggregator::summarize_vehicles(&days)
                .into_iter()
                .map(|v| {
                    let m = Measures::from(&v.totals);
                    VehicleRow {
                        vehicle: v.vehicle,
                        first_date: v.first_date,
                        last_date: v.last_date,
                        hours_before: m.hours_before,
                        hours_after: m.hours_after,
                        time_before_hhmm: m.time_before_hhmm,
                        time_after_hhmm: m.time_after_hhmm,
                        distance_before: m.distance_before,
                        distance_after: m.distance_after,
                        trips: m.trips,
                        days: v.days,
                    }
                })
                .collect(),
        ),
    };

    Ok(Report {
        level,
        selection,
        rows,
        totals: ActivityAggregator::calculate_totals(&days),
        skipped: analysis.skipped,
        generated_at: analysis.metadata.generated_at.clone(),
    })
}

impl Report {
    /// Write the report to `path` in `format`.
    pub fn write_to(&self, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
        match &self.rows {
            ReportRows::Trips(rows) => self.write_rows(rows, path, format),
            ReportRows::Daily(rows) => self.write_rows(rows, path, format),
            ReportRows::Weekly(rows) => self.write_rows(rows, path, format),
            ReportRows::Monthly(rows) => self.write_rows(rows, path, format),
            ReportRows::Vehicles(rows) => self.write_rows(rows, path, format),
        }
        .with_context(|| format!("Failed to write report {}", path.display()))
    }

    fn write_rows<T: Serialize>(
        &self,
        rows: &[T],
        path: &Path,
        format: OutputFormat,
    ) -> anyhow::Result<()> {
        match format {
            OutputFormat::Csv => {
                let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
            OutputFormat::Json => {
                let envelope = JsonReport {
                    level: self.level.as_str(),
                    selection: self.selection.map(|s| s.key()),
                    generated_at: &self.generated_at,
                    skipped: &self.skipped,
                    totals: Measures::from(&self.totals),
                    rows,
                };
                let writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(writer, &envelope)?;
            }
        }
        debug!("Wrote {} row(s) to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Output file name for a report.
///
/// `report_<level>_<selection>.<ext>` when narrowed, otherwise
/// `report_<level>_<input stem>.<ext>`.
pub fn report_file_name(
    level: ReportLevel,
    format: OutputFormat,
    input: &Path,
    selection: Option<&Selection>,
) -> String {
    match selection {
        Some(sel) => format!("report_{}_{}.{}", level, sel.key(), format.extension()),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "input".to_string());
            format!("report_{}_{}.{}", level, stem, format.extension())
        }
    }
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use shift_core::config::EngineConfig;
    use shift_data::analysis::analyze_table;
    use shift_data::reader::RawTable;
    use tempfile::TempDir;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_analysis() -> AnalysisResult {
        let rows: &[&[&str]] = &[
            &["C024", "2025-12-25 08:00:00", "10:32:00", "course", "2,53"],
            &["C024", "2025-12-25 19:00:00", "21:00:00", "course", "10"],
            &["C031", "2025-12-25 20:30:00", "22:00:00", "course", "5"],
            &["C024", "2025-12-25 18:00:00", "10:00:00", "course", "50"],
            &["C024", "2025-12-29 07:00:00", "08:00:00", "course", "3"],
            &["C024", "2026-01-02 21:00:00", "23:00:00", "course", "8"],
            &["C024", "2026-01-02 12:00:00", "13:00:00", "Transit", "8"],
        ];
        let table = RawTable::new(
            strings(&["Code", "Heure de départ", "Heure d'arrêt", "CAA", "KM"]),
            rows.iter().map(|r| strings(r)).collect(),
        );
        analyze_table(&table, &EngineConfig::default()).unwrap()
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_level_and_format_from_str() {
        assert_eq!("Weekly".parse::<ReportLevel>().unwrap(), ReportLevel::Weekly);
        assert!("hourly".parse::<ReportLevel>().is_err());
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_selection_from_args() {
        assert_eq!(Selection::from_args(None, None, None).unwrap(), None);

        let day = Selection::from_args(Some("2025-12-25"), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(day.key(), "2025-12-25");

        let week = Selection::from_args(None, Some("2025-W52"), None)
            .unwrap()
            .unwrap();
        assert!(week.contains(NaiveDate::from_ymd_opt(2025, 12, 28).unwrap()));
        assert!(!week.contains(NaiveDate::from_ymd_opt(2025, 12, 29).unwrap()));

        assert!(matches!(
            Selection::from_args(Some("25/12/2025"), None, None),
            Err(ShiftError::InvalidPeriod(_))
        ));
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_rows_are_rounded() {
        let report = build_report(&sample_analysis(), ReportLevel::Daily, None).unwrap();
        let ReportRows::Daily(rows) = &report.rows else {
            panic!("expected daily rows");
        };

        assert_eq!(rows.len(), 4);
        let first = &rows[0];
        assert_eq!(first.vehicle, "C024");
        assert_eq!(first.date.to_string(), "2025-12-25");
        // 9120 + 3600 + 7200 seconds before, 3600 + 50400 after.
        assert_eq!(first.hours_before, 5.53);
        assert_eq!(first.hours_after, 15.0);
        assert_eq!(first.time_before_hhmm, "05:32");
        assert_eq!(first.time_after_hhmm, "15:00");
        assert_eq!(first.distance_before, 13.78);
        assert_eq!(first.distance_after, 48.75);
        assert_eq!(first.trips, 3);
        assert_eq!(report.skipped.not_trip, 1);
    }

    #[test]
    fn test_weekly_rows_carry_iso_bounds() {
        let report = build_report(&sample_analysis(), ReportLevel::Weekly, None).unwrap();
        let ReportRows::Weekly(rows) = &report.rows else {
            panic!("expected weekly rows");
        };

        let keys: Vec<&str> = rows.iter().map(|r| r.year_week.as_str()).collect();
        assert_eq!(keys, vec!["2025-W52", "2026-W01", "2025-W52"]);
        assert_eq!(rows[1].week_start.to_string(), "2025-12-29");
        assert_eq!(rows[1].week_end.to_string(), "2026-01-04");
        assert_eq!(rows[1].days, 2);
    }

    #[test]
    fn test_monthly_and_vehicle_rows() {
        let analysis = sample_analysis();

        let monthly = build_report(&analysis, ReportLevel::Monthly, None).unwrap();
        let ReportRows::Monthly(rows) = &monthly.rows else {
            panic!("expected monthly rows");
        };
        assert_eq!(rows[0].year_month, "2025-12");
        assert_eq!(rows[0].trips, 4);
        assert_eq!(rows[1].year_month, "2026-01");
        assert_eq!(rows[1].hours_after, 2.0);

        let vehicles = build_report(&analysis, ReportLevel::Vehicles, None).unwrap();
        let ReportRows::Vehicles(rows) = &vehicles.rows else {
            panic!("expected vehicle rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].days, 3);
        assert_eq!(rows[1].vehicle, "C031");
        assert_eq!(rows[1].hours_after, 1.5);
    }

    #[test]
    fn test_trip_rows_sorted_by_vehicle_then_start() {
        let report = build_report(&sample_analysis(), ReportLevel::Trips, None).unwrap();
        let ReportRows::Trips(rows) = &report.rows else {
            panic!("expected trip rows");
        };

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].start, "2025-12-25 08:00:00");
        assert_eq!(rows[1].start, "2025-12-25 18:00:00");
        assert_eq!(rows[1].stop, "2025-12-26 10:00:00");
        assert_eq!(rows[1].seconds_before, 7200);
        assert_eq!(rows[1].distance_after, 43.75);
        assert_eq!(rows[5].vehicle, "C031");
    }

    #[test]
    fn test_selection_filters_days_and_totals() {
        let selection = Selection::from_args(None, None, Some("2026-01")).unwrap();
        let report = build_report(&sample_analysis(), ReportLevel::Daily, selection).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.totals.trips, 1);
        assert_eq!(report.totals.seconds_after, 7200);
    }

    #[test]
    fn test_selection_without_match_is_error() {
        let selection = Selection::from_args(Some("2024-01-01"), None, None).unwrap();
        let err = build_report(&sample_analysis(), ReportLevel::Daily, selection).unwrap_err();
        match err {
            ShiftError::NoRecords(key) => assert_eq!(key, "2024-01-01"),
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Writing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_write_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("daily.csv");
        let report = build_report(&sample_analysis(), ReportLevel::Daily, None).unwrap();

        report.write_to(&path, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "date,vehicle,hours_before,hours_after,time_before_hhmm,time_after_hhmm,distance_before,distance_after,trips"
        );
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("2025-12-25,C024,5.53,15.0,05:32,15:00,"));
    }

    #[test]
    fn test_write_json_envelope() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("weekly.json");
        let selection = Selection::from_args(None, Some("2025-W52"), None).unwrap();
        let report = build_report(&sample_analysis(), ReportLevel::Weekly, selection).unwrap();

        report.write_to(&path, OutputFormat::Json).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["level"], "weekly");
        assert_eq!(value["selection"], "2025-W52");
        assert_eq!(value["skipped"]["not_trip"], 1);
        assert_eq!(value["totals"]["trips"], 4);
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["week_start"], "2025-12-22");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("out.csv");
        let report = build_report(&sample_analysis(), ReportLevel::Daily, None).unwrap();
        assert!(report.write_to(&path, OutputFormat::Csv).is_err());
    }

    // ── report_file_name ──────────────────────────────────────────────────────

    #[test]
    fn test_report_file_name() {
        let input = Path::new("/data/export_dec.csv");
        assert_eq!(
            report_file_name(ReportLevel::Monthly, OutputFormat::Csv, input, None),
            "report_monthly_export_dec.csv"
        );

        let sel = Selection::Period(Period::parse_month("2025-12").unwrap());
        assert_eq!(
            report_file_name(ReportLevel::Daily, OutputFormat::Json, input, Some(&sel)),
            "report_daily_2025-12.json"
        );
        assert_ne!(
            report_file_name(ReportLevel::Weekly, OutputFormat::Json, input, Some(&sel)),
            report_file_name(ReportLevel::Daily, OutputFormat::Json, input, Some(&sel))
        );

        assert_eq!(
            report_file_name(ReportLevel::Daily, OutputFormat::Csv, Path::new("/data/exports"), None),
            "report_daily_exports.csv"
        );
    }
}
