use super::{load_report, print_json};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::AppError;
use crate::labels::storage;
use colored::Colorize;
use std::path::Path;

pub fn run(input: &Path, config: &Config, format: OutputFormat) -> Result<(), AppError> {
    let (batch, report) = load_report(input, config)?;
    let store = storage::load_store(input)?;

    let env_counts = batch.environment_counts();
    let label_counts = store.label_counts();
    let differing: usize = report.summary.iter().map(|s| s.different).sum();

    if format == OutputFormat::Json {
        let environments: serde_json::Map<String, serde_json::Value> = env_counts
            .iter()
            .map(|(env, count)| (env.clone(), (*count).into()))
            .collect();
        let labels: serde_json::Map<String, serde_json::Value> = label_counts
            .iter()
            .map(|(label, count)| (label.as_str().to_lowercase(), (*count).into()))
            .collect();
        return print_json(&serde_json::json!({
            "rows": batch.rows.len(),
            "skipped_rows": batch.skipped_rows,
            "environments": environments,
            "pairs": report.comparison.len(),
            "unmatched": report.diagnostics.len(),
            "fields": report.fields.len(),
            "comparisons": report.cell_count(),
            "different": differing,
            "labels": labels,
        }));
    }

    println!("{}", input.display().to_string().bold());
    println!("  Rows:        {}", batch.rows.len());
    if batch.skipped_rows > 0 {
        println!("  Skipped:     {} (blank identity)", batch.skipped_rows);
    }
    for (env, count) in &env_counts {
        println!("    {env:<12} {count}");
    }
    println!("  Pairs:       {}", report.comparison.len());
    println!("  Diagnostics: {}", report.diagnostics.len());
    println!(
        "  Compared:    {} field value(s), {} different",
        report.cell_count(),
        differing
    );
    println!("  Labels:      {}", store.len());
    for (label, count) in &label_counts {
        println!("    {:<12} {count}", label.as_str());
    }
    Ok(())
}
