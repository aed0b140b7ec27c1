//! End-to-end tests: CSV rows in, comparison and summary tables out.

use envdiff::compare::{compare_rows, Diagnostic, Status};
use envdiff::config::{Columns, Environments, FieldSet};
use envdiff::export::{self, ReportFormat};
use envdiff::ingest::read_rows;
use envdiff::model::Row;
use envdiff::Report;
use std::fs;
use tempfile::TempDir;

fn report_from_csv(csv: &str, fields: &[&str]) -> Report {
    let batch = read_rows(csv.as_bytes(), &Columns::default()).unwrap();
    compare_rows(
        &batch.rows,
        &FieldSet::new(fields.iter().copied()).unwrap(),
        &Environments::default(),
    )
}

#[test]
fn test_key_order_and_whitespace_are_ignored() {
    let csv = "\
casenumber,attachment_name,environment,X
1,a.pdf,NPR,\"{\"\"a\"\":1,\"\"b\"\":2}\"
1,a.pdf,Sandbox,\"{ \"\"b\"\": 2, \"\"a\"\": 1 }\"
";
    let report = report_from_csv(csv, &["X"]);

    let record = report.find("1", "a.pdf").unwrap();
    let x = record.field("X").unwrap();
    assert_eq!(x.status, Status::Same);
    assert_eq!(x.detail, "");
}

#[test]
fn test_changed_value_produces_unified_diff() {
    let csv = "\
casenumber,attachment_name,environment,X
1,a.pdf,NPR,\"{\"\"a\"\":1}\"
1,a.pdf,Sandbox,\"{\"\"a\"\":2}\"
";
    let report = report_from_csv(csv, &["X"]);

    let x = report.find("1", "a.pdf").unwrap().field("X").unwrap();
    assert_eq!(x.status, Status::Different);
    assert!(x.detail.contains("\n-  \"a\": 1\n"));
    assert!(x.detail.contains("\n+  \"a\": 2"));
    assert!(x.detail.starts_with("--- NPR\n+++ Sandbox\n@@"));
}

#[test]
fn test_unpaired_group_is_reported_not_compared() {
    let csv = "\
casenumber,attachment_name,environment,X
1,a.pdf,NPR,x
2,b.pdf,NPR,y
2,b.pdf,Sandbox,y
";
    let report = report_from_csv(csv, &["X"]);

    assert_eq!(report.comparison.len(), 1);
    assert!(report.find("1", "a.pdf").is_none());
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::MissingSide {
            case_id: "1".to_owned(),
            attachment_id: "a.pdf".to_owned(),
            missing: vec!["Sandbox".to_owned()],
        }]
    );
    assert!(report.diagnostics[0].to_string().contains("1 / a.pdf"));
}

#[test]
fn test_empty_batch_has_zero_summary_rows() {
    let csv = "casenumber,attachment_name,environment,X,Y\n";
    let report = report_from_csv(csv, &["X", "Y"]);

    assert!(report.comparison.is_empty());
    assert_eq!(report.summary.len(), 2);
    for (summary, field) in report.summary.iter().zip(["X", "Y"]) {
        assert_eq!(summary.prompt, field);
        assert_eq!(summary.same, 0);
        assert_eq!(summary.different, 0);
    }
}

#[test]
fn test_absent_and_empty_values_are_equal() {
    let rows = vec![
        Row::new("1", "a.pdf", "NPR"),
        Row::new("1", "a.pdf", "Sandbox").with_value("X", ""),
    ];
    let report = compare_rows(
        &rows,
        &FieldSet::new(["X"]).unwrap(),
        &Environments::default(),
    );
    assert_eq!(report.comparison[0].status("X"), Some(Status::Same));

    // Through CSV both sides are empty cells.
    let csv = "casenumber,attachment_name,environment,X\n1,a,NPR,\n1,a,Sandbox,\n";
    let report = report_from_csv(csv, &["X"]);
    assert_eq!(report.comparison[0].status("X"), Some(Status::Same));
}

#[test]
fn test_order_and_count_invariants() {
    let csv = "\
casenumber,attachment_name,environment,A,B,Ignored
3,c,Sandbox,1,x,z
1,a,NPR,1,x,z
3,c,NPR,2,x,z
1,a,Sandbox,1,y,z
2,b,NPR,not json,x,z
2,b,Sandbox,not  json,x,z
";
    let report = report_from_csv(csv, &["B", "A"]);

    let order: Vec<&str> = report
        .comparison
        .iter()
        .map(|r| r.case_id.as_str())
        .collect();
    assert_eq!(order, vec!["3", "1", "2"]);

    for record in &report.comparison {
        let names: Vec<&str> = record.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
    assert_eq!(
        report.comparison_header(),
        vec!["case_id", "attachment_id", "B_status", "B_detail", "A_status", "A_detail"]
    );

    for summary in &report.summary {
        assert_eq!(summary.total(), report.comparison.len());
    }
    // Non-JSON text is compared exactly.
    assert_eq!(report.find("2", "b").unwrap().status("A"), Some(Status::Different));
    assert_eq!(report.summary[1].prompt, "A");
    assert_eq!(report.summary[1].different, 2);
}

#[test]
fn test_export_all_formats() {
    let csv = "\
casenumber,attachment_name,environment,X
1,a.pdf,NPR,\"{\"\"a\"\":1}\"
1,a.pdf,Sandbox,\"{\"\"a\"\":2}\"
";
    let report = report_from_csv(csv, &["X"]);
    let dir = TempDir::new().unwrap();

    let csv_dir = dir.path().join("out");
    assert_eq!(export::write_report(&csv_dir, &report).unwrap(), ReportFormat::Csv);
    let summary = fs::read_to_string(csv_dir.join("summary.csv")).unwrap();
    assert_eq!(summary, "prompt,SAME,DIFFERENT\nX,0,1\n");

    let json_path = dir.path().join("report.json");
    assert_eq!(export::write_report(&json_path, &report).unwrap(), ReportFormat::Json);
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["comparison"][0]["fields"][0]["status"], "DIFFERENT");

    let xlsx_path = dir.path().join("report.xlsx");
    assert_eq!(export::write_report(&xlsx_path, &report).unwrap(), ReportFormat::Xlsx);
    assert!(xlsx_path.exists());
    assert!(!dir.path().join("report.xlsx.tmp").exists());
}
