//! Core types for the shift-boundary activity engine.
//!
//! Holds the trip data model, the error type, configuration, and the pure
//! computations (value parsing, interval splitting, distance allocation)
//! that the data layer composes into a pipeline.

pub mod allocation;
pub mod config;
pub mod error;
pub mod formatting;
pub mod interval;
pub mod models;
pub mod settings;
pub mod value_parser;

pub use error::{Result, ShiftError};
