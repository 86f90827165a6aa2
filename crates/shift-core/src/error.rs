use std::path::PathBuf;
use thiserror::Error;

use crate::models::ColumnRole;

/// All errors produced by the shift report engine.
#[derive(Error, Debug)]
pub enum ShiftError {
    /// One or more required semantic columns had no matching header.
    #[error(
        "Could not find required columns: {}. Found: {:?}",
        join_roles(.missing),
        .headers
    )]
    MissingColumns {
        missing: Vec<ColumnRole>,
        headers: Vec<String>,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited table could not be parsed.
    #[error("Failed to parse table {path}: {source}")]
    TableParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The input path given on the command line does not exist.
    #[error("Input path not found: {0}")]
    InputPathNotFound(PathBuf),

    /// No loadable table files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoInputFiles(PathBuf),

    /// The boundary hour is outside `0..=23`.
    #[error("Invalid boundary hour: {0} (expected 0-23)")]
    InvalidBoundaryHour(u32),

    /// A date, week or month selector could not be parsed.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// A report selection matched no aggregated records.
    #[error("No records found for {0}")]
    NoRecords(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the shift crates.
pub type Result<T> = std::result::Result<T, ShiftError>;

fn join_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
