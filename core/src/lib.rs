//! envdiff library - compare LLM extraction results across two environments.
//!
//! This crate provides:
//! - Value normalization, pairing, per-field diffing and summaries (`compare`)
//! - Line diffs into hunks and unified diff text (`diff`)
//! - Field set, environment and column configuration (`config`)
//! - CSV ingestion of result rows (`ingest`)
//! - CSV / JSON / XLSX report export (`export`)
//! - Manual correctness labels with persistent storage (`labels`)
//!
//! Feature flags:
//! - `cli`: Command-line interface

// Core modules (always compiled)
pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;

// Collaborators that feed and render the core
pub mod export;
pub mod ingest;
pub mod labels;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use compare::{compare_rows, ComparisonRecord, Report, Status, SummaryRecord};
pub use config::{Config, Environments, FieldSet};
pub use error::AppError;
pub use model::Row;
