//! CSV ingestion of extraction result rows.
//!
//! The whole file is read into memory; the engine works on a complete batch.

use crate::config::{Columns, FieldSet};
use crate::model::Row;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },
}

/// Rows loaded from one CSV file.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Non-identity columns, in header order.
    pub field_columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Rows dropped because their case or attachment id was blank.
    pub skipped_rows: usize,
}

impl Batch {
    /// Row counts per environment tag, in first-seen order.
    pub fn environment_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for row in &self.rows {
            match counts.iter_mut().find(|(env, _)| env == &row.environment) {
                Some((_, count)) => *count += 1,
                None => counts.push((row.environment.clone(), 1)),
            }
        }
        counts
    }

    /// Configured fields that the CSV header does not contain.
    pub fn missing_fields<'f>(&self, fields: &'f FieldSet) -> Vec<&'f str> {
        fields
            .iter()
            .filter(|f| !self.field_columns.iter().any(|c| c == *f))
            .collect()
    }

    /// First row for a case/attachment with the given environment tag.
    pub fn find_row(&self, case_id: &str, attachment_id: &str, environment: &str) -> Option<&Row> {
        self.rows.iter().find(|r| {
            r.case_id == case_id && r.attachment_id == attachment_id && r.environment == environment
        })
    }
}

/// Load a CSV file of result rows.
pub fn load_rows(path: &Path, columns: &Columns) -> Result<Batch, IngestError> {
    log::info!("[ingest] Loading data from {}", path.display());
    let file = File::open(path)?;
    let batch = read_rows(file, columns)?;
    log::info!(
        "[ingest] Loaded {} row(s), {} field column(s)",
        batch.rows.len(),
        batch.field_columns.len()
    );
    Ok(batch)
}

/// Read result rows from any CSV source with a header line.
///
/// Identity columns are required. Every other column becomes a field; empty
/// cells are treated as absent values.
pub fn read_rows<R: Read>(reader: R, columns: &Columns) -> Result<Batch, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.to_owned()
        })
        .collect();

    let position = |column: &str| -> Result<usize, IngestError> {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_owned(),
            })
    };
    let case_idx = position(&columns.case_id)?;
    let attachment_idx = position(&columns.attachment_id)?;
    let env_idx = position(&columns.environment)?;

    let field_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| ![case_idx, attachment_idx, env_idx].contains(i))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut batch = Batch {
        field_columns: field_columns.iter().map(|(_, h)| h.clone()).collect(),
        ..Batch::default()
    };

    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let case_id = cell(case_idx);
        let attachment_id = cell(attachment_idx);
        if case_id.is_empty() || attachment_id.is_empty() {
            let line = record.position().map_or(0, csv::Position::line);
            log::warn!("[ingest] Skipping line {line}: blank case or attachment id");
            batch.skipped_rows += 1;
            continue;
        }

        let mut row = Row::new(case_id, attachment_id, cell(env_idx));
        for (idx, name) in &field_columns {
            let value = cell(*idx);
            if !value.is_empty() {
                row.values.insert(name.clone(), value.to_owned());
            }
        }
        batch.rows.push(row);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
casenumber,attachment_name,environment,Response,QuantityInfo
100,a.pdf,NPR,\"{\"\"a\"\":1}\",3
100,a.pdf,Sandbox,\"{\"\"a\"\": 1}\",
";

    #[test]
    fn test_read_rows_maps_identity_and_fields() {
        let batch = read_rows(SAMPLE.as_bytes(), &Columns::default()).unwrap();

        assert_eq!(batch.field_columns, vec!["Response", "QuantityInfo"]);
        assert_eq!(batch.rows.len(), 2);
        let npr = &batch.rows[0];
        assert_eq!(npr.case_id, "100");
        assert_eq!(npr.attachment_id, "a.pdf");
        assert_eq!(npr.environment, "NPR");
        assert_eq!(npr.value("Response"), Some(r#"{"a":1}"#));
        assert_eq!(npr.value("QuantityInfo"), Some("3"));
    }

    #[test]
    fn test_empty_cell_is_absent() {
        let batch = read_rows(SAMPLE.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(batch.rows[1].value("QuantityInfo"), None);
    }

    #[test]
    fn test_missing_identity_column() {
        let csv = "casenumber,environment,Response\n1,NPR,x\n";
        let err = read_rows(csv.as_bytes(), &Columns::default()).unwrap_err();
        assert!(
            matches!(err, IngestError::MissingColumn { ref column } if column == "attachment_name")
        );
    }

    #[test]
    fn test_bom_and_ragged_rows() {
        let csv = "\u{feff}casenumber,attachment_name,environment,Response\n1,a,NPR\n";
        let batch = read_rows(csv.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].value("Response"), None);
    }

    #[test]
    fn test_blank_identity_rows_are_skipped() {
        let csv = "casenumber,attachment_name,environment\n,a,NPR\n1,a,NPR\n";
        let batch = read_rows(csv.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.skipped_rows, 1);
    }

    #[test]
    fn test_custom_columns() {
        let csv = "case,file,env,R\n1,a,prod,x\n";
        let columns = Columns {
            case_id: "case".to_owned(),
            attachment_id: "file".to_owned(),
            environment: "env".to_owned(),
        };
        let batch = read_rows(csv.as_bytes(), &columns).unwrap();
        assert_eq!(batch.rows[0].environment, "prod");
        assert_eq!(batch.field_columns, vec!["R"]);
    }

    #[test]
    fn test_environment_counts_and_missing_fields() {
        let batch = read_rows(SAMPLE.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(
            batch.environment_counts(),
            vec![("NPR".to_owned(), 1), ("Sandbox".to_owned(), 1)]
        );
        let fields = FieldSet::new(["Response", "FlagsProvider"]).unwrap();
        assert_eq!(batch.missing_fields(&fields), vec!["FlagsProvider"]);
    }
}
