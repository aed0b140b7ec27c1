use super::{load_report, percent, print_json};
use crate::cli::OutputFormat;
use crate::compare::Report;
use crate::config::Config;
use crate::error::AppError;
use crate::export;
use colored::Colorize;
use std::path::Path;

pub fn run(
    input: &Path,
    output: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (_, report) = load_report(input, config)?;

    let written = match output {
        Some(path) => {
            let report_format = export::write_report(path, &report)?;
            Some((path, report_format))
        }
        None => None,
    };

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "pairs": report.comparison.len(),
            "summary": report.summary,
            "diagnostics": report.diagnostics,
            "output": written.map(|(path, _)| path.display().to_string()),
        }));
    }

    print_summary(&report);

    if !report.diagnostics.is_empty() {
        println!();
        println!("{}", "Skipped:".yellow().bold());
        for diagnostic in &report.diagnostics {
            println!("  {diagnostic}");
        }
    }

    if let Some((path, report_format)) = written {
        println!();
        println!("Wrote {report_format:?} report to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &Report) {
    let envs = &report.environments;
    println!(
        "{} vs {}: {} matched pair(s)",
        envs.baseline.bold(),
        envs.candidate.bold(),
        report.comparison.len()
    );
    println!();

    let width = report
        .summary
        .iter()
        .map(|s| s.prompt.len())
        .max()
        .unwrap_or(0)
        .max("prompt".len());

    println!(
        "  {:<width$}  {:>6}  {:>9}",
        "prompt".bold(),
        "SAME".bold(),
        "DIFFERENT".bold()
    );
    for record in &report.summary {
        let same_pct = percent(record.same, record.total());
        let different = if record.different > 0 {
            record.different.to_string().red()
        } else {
            record.different.to_string().green()
        };
        println!(
            "  {:<width$}  {:>6}  {:>9}  ({same_pct:>3}% same)",
            record.prompt, record.same, different
        );
    }
}
