use super::{write_atomic, ExportError};
use crate::compare::{Report, SUMMARY_HEADER};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::borrow::Cow;
use std::path::Path;

pub const COMPARISON_SHEET: &str = "Comparison";
pub const SUMMARY_SHEET: &str = "Summary";

/// Excel refuses cell strings longer than this many characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Write a workbook with a `Comparison` and a `Summary` sheet.
pub fn write_xlsx_report(path: &Path, report: &Report) -> Result<(), ExportError> {
    let mut workbook = build_workbook(report)?;
    write_atomic(path, |tmp| {
        workbook.save(tmp)?;
        Ok(())
    })
}

fn build_workbook(report: &Report) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(COMPARISON_SHEET)?;
        write_header(sheet, &report.comparison_header(), &header)?;
        for (idx, record) in report.comparison.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, value) in record.to_row().iter().enumerate() {
                sheet.write_string(row, col as u16, fit_cell(value).as_ref())?;
            }
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_header(sheet, &SUMMARY_HEADER, &header)?;
        for (idx, summary) in report.summary.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet.write_string(row, 0, &summary.prompt)?;
            sheet.write_number(row, 1, summary.same as f64)?;
            sheet.write_number(row, 2, summary.different as f64)?;
        }
    }

    Ok(workbook)
}

fn write_header<S: AsRef<str>>(
    sheet: &mut Worksheet,
    names: &[S],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name.as_ref(), format)?;
    }
    Ok(())
}

fn fit_cell(value: &str) -> Cow<'_, str> {
    if value.chars().count() <= MAX_CELL_CHARS {
        return Cow::Borrowed(value);
    }
    log::warn!("[export] Truncating cell of {} chars for XLSX", value.chars().count());
    Cow::Owned(value.chars().take(MAX_CELL_CHARS).collect())
}
