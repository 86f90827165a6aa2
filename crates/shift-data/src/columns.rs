//! Mapping of heterogeneous export headers to semantic column roles.
//!
//! Fleet exports label the same column many ways (`Heure de départ`,
//! `HEURE DEPART`, `Start time`). Matching is a case-insensitive substring
//! test against per-role keyword sets that cover accented and unaccented
//! spellings.

use regex::Regex;
use shift_core::error::{Result, ShiftError};
use shift_core::models::ColumnRole;
use tracing::debug;

/// Resolved column positions for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub vehicle: usize,
    pub start_time: usize,
    pub stop_time: usize,
    pub activity_type: usize,
    /// Absent when the export has no distance column.
    pub distance: Option<usize>,
}

/// Normalize a raw header: drop a BOM and combining accents, trim, collapse
/// inner whitespace.
///
/// Decomposed accents (`e` + U+0301, as written by some macOS tools) are
/// removed so that such headers fall back to the unaccented keywords.
pub fn normalize_header(raw: &str) -> String {
    let marks = Regex::new(r"[\x{0300}-\x{036F}]").expect("regex is valid");
    let ws = Regex::new(r"\s+").expect("regex is valid");
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    let bare = marks.replace_all(trimmed, "");
    ws.replace_all(&bare, " ").into_owned()
}

/// Whether a (lowercased, normalized) header names `role`.
pub fn header_matches(role: ColumnRole, header: &str) -> bool {
    let h = header.to_lowercase();
    let has = |k: &str| h.contains(k);
    let has_any = |ks: &[&str]| ks.iter().any(|k| h.contains(k));

    match role {
        ColumnRole::Vehicle => has("code") || has_any(&["vehicle", "véhicule", "vehicule"]),
        ColumnRole::StartTime => {
            (has("heure") && has_any(&["départ", "depart"])) || has("start")
        }
        ColumnRole::StopTime => {
            (has("heure") && has_any(&["arrêt", "arret"]))
                || has("stop")
                || has("end time")
        }
        ColumnRole::ActivityType => {
            has("caa") || has_any(&["activity", "activité", "activite"])
        }
        ColumnRole::Distance => has("km") || has("distance"),
    }
}

/// Resolve column roles for `headers`.
///
/// Each role takes the first matching header in table order, and a header is
/// never assigned to two roles. Fails with [`ShiftError::MissingColumns`]
/// naming every unresolved required role.
pub fn resolve_columns(headers: &[String]) -> Result<ResolvedColumns> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut taken = vec![false; normalized.len()];
    let mut found: [Option<usize>; 5] = [None; 5];

    for (slot, role) in ColumnRole::ALL.iter().enumerate() {
        let hit = normalized
            .iter()
            .enumerate()
            .find(|(i, h)| !taken[*i] && header_matches(*role, h))
            .map(|(i, _)| i);
        if let Some(i) = hit {
            taken[i] = true;
            debug!("column {} -> {:?}", role, headers[i]);
        }
        found[slot] = hit;
    }

    let missing: Vec<ColumnRole> = ColumnRole::ALL
        .iter()
        .zip(found.iter())
        .filter(|(role, idx)| role.is_required() && idx.is_none())
        .map(|(role, _)| *role)
        .collect();

    match found {
        [Some(vehicle), Some(start_time), Some(stop_time), Some(activity_type), distance] => {
            Ok(ResolvedColumns {
                vehicle,
                start_time,
                stop_time,
                activity_type,
                distance,
            })
        }
        _ => Err(ShiftError::MissingColumns {
            missing,
            headers: headers.to_vec(),
        }),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
