use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftError};
use crate::interval::Boundary;
use crate::value_parser::{ValueParser, DEFAULT_TIMESTAMP_FORMATS};

/// Activity label that marks a row as a trip in the source exports.
pub const DEFAULT_TRIP_LABEL: &str = "course";

/// Header rows scanned when the header position is auto-detected.
pub const HEADER_SCAN_LIMIT: usize = 5;

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Knobs consumed by the parsing and splitting stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub boundary: Boundary,
    /// Activity label kept for splitting, compared case-insensitively.
    pub trip_label: String,
    /// Date + time formats tried in order.
    pub timestamp_formats: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            boundary: Boundary::default(),
            trip_label: DEFAULT_TRIP_LABEL.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Build a config, validating the boundary hour and the trip label.
    ///
    /// `extra_formats` are tried before the built-in timestamp formats.
    pub fn new(boundary_hour: u32, trip_label: &str, extra_formats: &[String]) -> Result<Self> {
        let boundary = Boundary::at_hour(boundary_hour)?;
        let trip_label = trip_label.trim();
        if trip_label.is_empty() {
            return Err(ShiftError::Config("trip label must not be empty".to_string()));
        }

        let mut timestamp_formats: Vec<String> = extra_formats
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        for fmt in DEFAULT_TIMESTAMP_FORMATS {
            if !timestamp_formats.iter().any(|f| f == fmt) {
                timestamp_formats.push(fmt.to_string());
            }
        }

        Ok(Self {
            boundary,
            trip_label: trip_label.to_string(),
            timestamp_formats,
        })
    }

    pub fn value_parser(&self) -> ValueParser {
        ValueParser::new(self.timestamp_formats.clone())
    }
}

// ── ReaderOptions ─────────────────────────────────────────────────────────────

/// How delimited exports are loaded into a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Field delimiter; sniffed from the first line when `None`.
    pub delimiter: Option<u8>,
    /// Leading records to drop before the header; auto-detected when `None`.
    pub skip_rows: Option<usize>,
}

impl ReaderOptions {
    /// Parse a delimiter setting: `auto`, `tab`, `semicolon`, `comma`, or a
    /// single ASCII character.
    pub fn parse_delimiter(value: &str) -> Result<Option<u8>> {
        match value.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(None),
            "tab" | "\\t" => Ok(Some(b'\t')),
            "semicolon" => Ok(Some(b';')),
            "comma" => Ok(Some(b',')),
            other => {
                let bytes = other.as_bytes();
                if bytes.len() == 1 && bytes[0].is_ascii() {
                    Ok(Some(bytes[0]))
                } else {
                    Err(ShiftError::Config(format!("invalid delimiter: {value:?}")))
                }
            }
        }
    }
}
