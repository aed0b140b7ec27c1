//! Report export: CSV tables, a JSON document, or an XLSX workbook.
//!
//! Every file is written to a `.tmp` sibling first and renamed into place, so
//! a failed export never leaves a truncated report behind.

pub mod csv;
pub mod json;
pub mod xlsx;

pub use self::csv::write_csv_report;
pub use json::write_json_report;
pub use xlsx::write_xlsx_report;

use crate::compare::Report;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// A directory holding `comparison.csv` and `summary.csv`.
    Csv,
    Json,
    Xlsx,
}

impl ReportFormat {
    /// Pick the format from the output path's extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => Self::Xlsx,
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Write a report to `path` in the format implied by its extension.
pub fn write_report(path: &Path, report: &Report) -> Result<ReportFormat, ExportError> {
    let format = ReportFormat::from_path(path);
    log::info!("[export] Writing {format:?} report to {}", path.display());
    match format {
        ReportFormat::Csv => {
            write_csv_report(path, report)?;
        }
        ReportFormat::Json => write_json_report(path, report)?,
        ReportFormat::Xlsx => write_xlsx_report(path, report)?,
    }
    Ok(format)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Run `write` against a temporary path, then move the result to `path`.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&Path) -> Result<(), ExportError>,
{
    let tmp = tmp_path(path);
    if let Err(e) = write(&tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
