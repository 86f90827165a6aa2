mod bootstrap;
mod report;

use anyhow::Result;
use shift_core::formatting::{round_distance, seconds_to_hours};
use shift_core::settings::Settings;
use shift_data::analysis::analyze_tables;
use shift_data::reader::{find_input_files, load_table};

use crate::report::{build_report, report_file_name, OutputFormat, ReportLevel, Selection};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("shift-report v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.engine_config()?;
    let options = settings.reader_options()?;
    let level: ReportLevel = settings.period.parse()?;
    let format: OutputFormat = settings.format.parse()?;
    let selection = Selection::from_args(
        settings.date.as_deref(),
        settings.week.as_deref(),
        settings.month.as_deref(),
    )?;

    tracing::info!(
        "Level: {}, boundary: {:02}:00, trip label: {:?}",
        level,
        config.boundary.hour(),
        config.trip_label
    );

    // ── Load ──────────────────────────────────────────────────────────────────
    let files = find_input_files(&settings.input)?;
    let tables = files
        .iter()
        .map(|path| load_table(path, &options))
        .collect::<shift_core::Result<Vec<_>>>()?;

    // ── Analyse ───────────────────────────────────────────────────────────────
    let analysis = analyze_tables(&tables, &config)?;
    if analysis.trips.is_empty() {
        tracing::warn!("No trips matched label {:?}", config.trip_label);
    }

    // ── Report ────────────────────────────────────────────────────────────────
    let report = build_report(&analysis, level, selection)?;

    let output_dir = bootstrap::ensure_output_dir(&settings.output_dir)?;
    let path = output_dir.join(report_file_name(
        level,
        format,
        &settings.input,
        selection.as_ref(),
    ));
    report.write_to(&path, format)?;

    tracing::info!(
        "Wrote {} {} row(s) to {}",
        report.rows.len(),
        level,
        path.display()
    );
    tracing::info!(
        "Totals: {} trip(s), {:.2} h before / {:.2} h after, {:.3} / {:.3} km",
        report.totals.trips,
        seconds_to_hours(report.totals.seconds_before),
        seconds_to_hours(report.totals.seconds_after),
        round_distance(report.totals.distance_before),
        round_distance(report.totals.distance_after)
    );
    if analysis.skipped.total() > 0 {
        tracing::info!(
            "Skipped {} row(s) ({} blank, {} other activity, {} malformed)",
            analysis.skipped.total(),
            analysis.skipped.blank_rows,
            analysis.skipped.not_trip,
            analysis.skipped.defective()
        );
    }

    Ok(())
}
