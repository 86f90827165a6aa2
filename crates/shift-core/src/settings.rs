use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{EngineConfig, ReaderOptions, DEFAULT_TRIP_LABEL};
use crate::error::Result;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Split fleet trip time and distance at a daily boundary hour
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shift-report",
    about = "Split fleet trip time and distance at a daily boundary hour",
    version
)]
pub struct Settings {
    /// Input CSV file, or a directory scanned recursively for CSV files
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report level
    #[arg(long, default_value = "daily", value_parser = ["trips", "daily", "weekly", "monthly", "vehicles"])]
    pub period: String,

    /// Output file format
    #[arg(long, default_value = "csv", value_parser = ["csv", "json"])]
    pub format: String,

    /// Output directory
    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    /// Only report the given day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["week", "month"])]
    pub date: Option<String>,

    /// Only report the given ISO week (YYYY-Www)
    #[arg(long, conflicts_with = "month")]
    pub week: Option<String>,

    /// Only report the given month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,

    /// Hour of day (0-23) at which durations are split
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(0..=23))]
    pub boundary_hour: u32,

    /// Activity label counted as a trip (case-insensitive)
    #[arg(long, default_value = DEFAULT_TRIP_LABEL)]
    pub trip_label: String,

    /// Extra timestamp format (chrono strftime), tried before the built-in ones
    #[arg(long = "timestamp-format")]
    pub timestamp_formats: Vec<String>,

    /// Field delimiter: auto, comma, semicolon, tab, or a single character
    #[arg(long, default_value = "auto")]
    pub delimiter: String,

    /// Leading rows to skip before the header (auto-detected if not specified)
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.shift-report/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.shift-report/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".shift-report").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. Input path, selectors and engine values (boundary
        // hour, trip label, formats) are never persisted.
        if !is_arg_explicitly_set(&matches, "period") {
            if let Some(v) = last.period {
                settings.period = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "output_dir") {
            if let Some(v) = last.output_dir {
                settings.output_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "delimiter") {
            if let Some(v) = last.delimiter {
                settings.delimiter = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Validated engine configuration derived from the CLI values.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::new(
            self.boundary_hour,
            &self.trip_label,
            &self.timestamp_formats,
        )
    }

    /// Table loading options derived from the CLI values.
    pub fn reader_options(&self) -> Result<ReaderOptions> {
        Ok(ReaderOptions {
            delimiter: ReaderOptions::parse_delimiter(&self.delimiter)?,
            skip_rows: self.skip_rows,
        })
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            period: Some(s.period.clone()),
            format: Some(s.format.clone()),
            output_dir: Some(s.output_dir.clone()),
            delimiter: Some(s.delimiter.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
