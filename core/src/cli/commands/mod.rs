pub mod compare;
pub mod fields;
pub mod label;
pub mod labels;
pub mod show;
pub mod stats;

use crate::compare::{compare_rows, Report};
use crate::config::Config;
use crate::error::AppError;
use crate::ingest::{self, Batch};
use std::path::Path;

/// Serialize a value as pretty-printed JSON and print it to stdout.
fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn load_batch(input: &Path, config: &Config) -> Result<Batch, AppError> {
    let batch = ingest::load_rows(input, &config.columns)?;
    for field in batch.missing_fields(&config.fields) {
        log::warn!("[cli] Field '{field}' is not a column of {}", input.display());
    }
    Ok(batch)
}

/// Load a batch and run the comparison engine over it.
fn load_report(input: &Path, config: &Config) -> Result<(Batch, Report), AppError> {
    let batch = load_batch(input, config)?;
    let report = compare_rows(&batch.rows, &config.fields, &config.environments);
    Ok((batch, report))
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        100
    } else {
        (part as f64 / total as f64 * 100.0) as u32
    }
}
