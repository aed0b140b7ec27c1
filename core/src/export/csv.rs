use super::{write_atomic, ExportError};
use crate::compare::{Report, SUMMARY_HEADER};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const COMPARISON_FILE: &str = "comparison.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Write `comparison.csv` and `summary.csv` into `dir`, creating it if needed.
pub fn write_csv_report(dir: &Path, report: &Report) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;

    let comparison_path = dir.join(COMPARISON_FILE);
    write_atomic(&comparison_path, |tmp| {
        write_comparison(fs::File::create(tmp)?, report)
    })?;

    let summary_path = dir.join(SUMMARY_FILE);
    write_atomic(&summary_path, |tmp| {
        write_summary(fs::File::create(tmp)?, report)
    })?;

    Ok(vec![comparison_path, summary_path])
}

/// Comparison table: identity columns, then status and detail per field.
pub fn write_comparison<W: Write>(out: W, report: &Report) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_writer(out);
    writer.write_record(report.comparison_header())?;
    for record in &report.comparison {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Summary table: `prompt`, `SAME`, `DIFFERENT`.
pub fn write_summary<W: Write>(out: W, report: &Report) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_writer(out);
    writer.write_record(SUMMARY_HEADER)?;
    for summary in &report.summary {
        writer.write_record(summary.to_row())?;
    }
    writer.flush()?;
    Ok(())
}
