//! Core types for the meter-chart workspace.
//!
//! Holds the typed row model and parse/aggregation enums, the error
//! taxonomy, timestamp parsing, metric categorization, and the CLI settings
//! shared by the downstream crates.

pub mod error;
pub mod metrics;
pub mod models;
pub mod settings;
pub mod timestamp;
