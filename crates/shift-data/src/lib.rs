//! Data layer for the shift-boundary activity engine.
//!
//! Discovers and reads delimited fleet exports, maps their headers to column
//! roles, runs the row-level analysis pipeline and aggregates split trips by
//! vehicle over days, ISO weeks and months.

pub mod aggregator;
pub mod analysis;
pub mod columns;
pub mod reader;

pub use shift_core as core;
