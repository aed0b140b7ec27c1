//! The comparison engine.
//!
//! rows → [`pairing::match_pairs`] → [`builder::build_comparison`] (which runs
//! [`field::compare_values`] and [`normalize::normalize_value`] per field) →
//! [`summary::summarize`].
//!
//! Everything here is a pure, synchronous transformation of an in-memory
//! batch. I/O belongs to `ingest` and `export`.

pub mod builder;
pub mod field;
pub mod normalize;
pub mod pairing;
pub mod summary;

pub use builder::build_comparison;
pub use field::{compare_values, FieldComparison};
pub use normalize::normalize_value;
pub use pairing::{match_pairs, Diagnostic, MatchedPair, Pairing};
pub use summary::summarize;

use crate::config::{Environments, FieldSet};
use crate::model::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Same,
    Different,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Same => "SAME",
            Status::Different => "DIFFERENT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and diff detail of one field within a comparison record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    pub field: String,
    pub status: Status,
    pub detail: String,
}

/// Per-field results for one case/attachment present in both environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub case_id: String,
    pub attachment_id: String,
    pub fields: Vec<FieldResult>,
}

impl ComparisonRecord {
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.field == name)
    }

    pub fn status(&self, name: &str) -> Option<Status> {
        self.field(name).map(|f| f.status)
    }

    /// Table row: `case_id`, `attachment_id`, then status and detail per field.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(2 + self.fields.len() * 2);
        row.push(self.case_id.clone());
        row.push(self.attachment_id.clone());
        for result in &self.fields {
            row.push(result.status.as_str().to_owned());
            row.push(result.detail.clone());
        }
        row
    }
}

/// SAME/DIFFERENT counts for one field across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub prompt: String,
    #[serde(rename = "SAME")]
    pub same: usize,
    #[serde(rename = "DIFFERENT")]
    pub different: usize,
}

impl SummaryRecord {
    pub fn total(&self) -> usize {
        self.same + self.different
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.prompt.clone(),
            self.same.to_string(),
            self.different.to_string(),
        ]
    }
}

/// Column names of the summary table.
pub const SUMMARY_HEADER: [&str; 3] = ["prompt", "SAME", "DIFFERENT"];

/// Column names of the comparison table for a field set.
pub fn comparison_header(fields: &FieldSet) -> Vec<String> {
    let mut header = vec!["case_id".to_owned(), "attachment_id".to_owned()];
    for field in fields.iter() {
        header.push(format!("{field}_status"));
        header.push(format!("{field}_detail"));
    }
    header
}

/// Everything produced by one run of the engine over a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub fields: FieldSet,
    pub environments: Environments,
    pub comparison: Vec<ComparisonRecord>,
    pub summary: Vec<SummaryRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn comparison_header(&self) -> Vec<String> {
        comparison_header(&self.fields)
    }

    pub fn find(&self, case_id: &str, attachment_id: &str) -> Option<&ComparisonRecord> {
        self.comparison
            .iter()
            .find(|r| r.case_id == case_id && r.attachment_id == attachment_id)
    }

    /// Number of field comparisons in the report (pairs × fields).
    pub fn cell_count(&self) -> usize {
        self.comparison.len() * self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparison.is_empty()
    }
}

/// Run pairing, per-field comparison and summarizing over a batch of rows.
pub fn compare_rows(rows: &[Row], fields: &FieldSet, envs: &Environments) -> Report {
    let pairing = match_pairs(rows, envs);
    let comparison = build_comparison(&pairing, fields, envs);
    let summary = summarize(&comparison, fields);

    log::info!(
        "[compare] Compared {} pair(s) across {} field(s)",
        comparison.len(),
        fields.len()
    );

    Report {
        fields: fields.clone(),
        environments: envs.clone(),
        comparison,
        summary,
        diagnostics: pairing.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FieldSet {
        FieldSet::new(["X", "Y"]).unwrap()
    }

    #[test]
    fn test_comparison_header_follows_field_order() {
        assert_eq!(
            comparison_header(&fields()),
            vec![
                "case_id",
                "attachment_id",
                "X_status",
                "X_detail",
                "Y_status",
                "Y_detail"
            ]
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Same).unwrap(), "\"SAME\"");
        assert_eq!(
            serde_json::to_string(&Status::Different).unwrap(),
            "\"DIFFERENT\""
        );
    }

    #[test]
    fn test_summary_record_serializes_table_columns() {
        let record = SummaryRecord {
            prompt: "X".to_owned(),
            same: 2,
            different: 1,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"prompt":"X","SAME":2,"DIFFERENT":1}"#);
    }

    #[test]
    fn test_compare_rows_end_to_end() {
        let rows = vec![
            Row::new("1", "a", "NPR").with_value("X", r#"{"a":1,"b":2}"#),
            Row::new("1", "a", "Sandbox").with_value("X", r#"{"b":2,"a":1}"#),
            Row::new("2", "b", "NPR").with_value("X", r#"{"a":1}"#),
            Row::new("2", "b", "Sandbox").with_value("X", r#"{"a":2}"#),
            Row::new("3", "c", "NPR"),
        ];
        let report = compare_rows(&rows, &fields(), &Environments::default());

        assert_eq!(report.comparison.len(), 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.find("1", "a").unwrap().status("X"), Some(Status::Same));
        assert_eq!(
            report.find("2", "b").unwrap().status("X"),
            Some(Status::Different)
        );
        assert!(report.find("3", "c").is_none());

        let row = report.comparison[0].to_row();
        assert_eq!(row.len(), report.comparison_header().len());
        assert_eq!(report.cell_count(), 4);
    }
}
