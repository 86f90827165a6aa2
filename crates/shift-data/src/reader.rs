//! Delimited export discovery and loading.
//!
//! Reads fleet activity exports into a [`RawTable`] of untyped string cells.
//! Interpretation of the cells is left to the analysis pipeline.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use shift_core::config::{ReaderOptions, HEADER_SCAN_LIMIT};
use shift_core::error::{Result, ShiftError};
use tracing::{debug, warn};

use crate::columns::resolve_columns;

const TABLE_EXTENSIONS: &[&str] = &["csv", "txt"];

// ── RawTable ──────────────────────────────────────────────────────────────────

/// A loaded table: header labels plus rows of raw cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// File the table was read from, if any.
    pub source: Option<PathBuf>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: None,
            headers,
            rows,
        }
    }

    /// Human-readable origin for log messages.
    pub fn label(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

/// Cell `idx` of `row`, or `""` when the row is short.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// `true` when every cell of `row` is empty or whitespace.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Resolve `path` to the list of table files to load.
///
/// A file is returned as-is. A directory is walked recursively for `.csv` and
/// `.txt` files, sorted by path.
pub fn find_input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(ShiftError::InputPathNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| TABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(ShiftError::NoInputFiles(path.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load one delimited file into a [`RawTable`].
pub fn load_table(path: &Path, options: &ReaderOptions) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|source| ShiftError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let content = decode_bytes(&bytes);
    let mut table = parse_table(&content, options, path)?;
    table.source = Some(path.to_path_buf());
    debug!(
        "Loaded {} rows with {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse delimited `content` into a [`RawTable`]. `origin` only labels errors.
pub fn parse_table(content: &str, options: &ReaderOptions, origin: &Path) -> Result<RawTable> {
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(content));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record: StringRecord = result.map_err(|source| ShiftError::TableParse {
            path: origin.to_path_buf(),
            source,
        })?;
        records.push(record.iter().map(|c| c.to_string()).collect());
    }

    let header_idx = match options.skip_rows {
        Some(n) => n,
        None => locate_header(&records),
    };

    if header_idx >= records.len() {
        warn!("{}: no header row found", origin.display());
        return Ok(RawTable::default());
    }

    let rows = records.split_off(header_idx + 1);
    let headers = records.swap_remove(header_idx);
    Ok(RawTable::new(headers, rows))
}

/// Index of the first of the leading records whose cells resolve every
/// required column. Falls back to `0`, letting resolution report what is
/// missing.
fn locate_header(records: &[Vec<String>]) -> usize {
    let idx = records
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|r| resolve_columns(r).is_ok())
        .unwrap_or(0);
    if idx > 0 {
        debug!("Skipping {} leading row(s) before header", idx);
    }
    idx
}

/// Pick the most frequent of `;`, tab and `,` over the first non-empty lines.
///
/// Ties prefer `;`, the separator of the fleet exports. Defaults to `,`.
pub fn detect_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(HEADER_SCAN_LIMIT)
        .collect();

    let mut best = (b',', 0usize);
    for candidate in [b';', b'\t', b','] {
        let count: usize = sample
            .iter()
            .map(|l| l.bytes().filter(|b| *b == candidate).count())
            .sum();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

/// Decode file bytes as UTF-8, falling back to Latin-1 for legacy exports.
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("Input is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
