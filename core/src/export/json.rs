use super::{write_atomic, ExportError};
use crate::compare::Report;
use std::fs;
use std::path::Path;

/// Write the full report (fields, comparison, summary, diagnostics) as JSON.
pub fn write_json_report(path: &Path, report: &Report) -> Result<(), ExportError> {
    let content = serde_json::to_string_pretty(report)?;
    write_atomic(path, |tmp| {
        fs::write(tmp, content)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_rows;
    use crate::config::{Environments, FieldSet};
    use crate::model::Row;
    use tempfile::TempDir;

    #[test]
    fn test_json_report_shape() {
        let rows = vec![
            Row::new("1", "a", "NPR").with_value("X", "same"),
            Row::new("1", "a", "Sandbox").with_value("X", "same"),
            Row::new("2", "b", "Sandbox"),
        ];
        let report = compare_rows(
            &rows,
            &FieldSet::new(["X"]).unwrap(),
            &Environments::default(),
        );
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_json_report(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["fields"], serde_json::json!(["X"]));
        assert_eq!(value["comparison"][0]["fields"][0]["status"], "SAME");
        assert_eq!(value["summary"][0]["SAME"], 1);
        assert_eq!(value["diagnostics"][0]["kind"], "missing_side");
        assert_eq!(value["diagnostics"][0]["case_id"], "2");
    }
}
