use super::{load_batch, print_json};
use crate::cli::OutputFormat;
use crate::compare::{compare_values, normalize_value, Status};
use crate::config::Config;
use crate::diff::{diff_hunks, LineType, CONTEXT_LINES};
use crate::error::AppError;
use colored::Colorize;
use std::path::Path;

pub fn run(
    input: &Path,
    case: &str,
    attachment: &str,
    field: &str,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    let batch = load_batch(input, config)?;
    let envs = &config.environments;

    let find = |env: &str| {
        batch
            .find_row(case, attachment, env)
            .ok_or_else(|| AppError::not_found(format!("{env} row for case {case} / {attachment}")))
    };
    let baseline = find(&envs.baseline)?;
    let candidate = find(&envs.candidate)?;

    let baseline_value = baseline.value(field);
    let candidate_value = candidate.value(field);
    let result = compare_values(baseline_value, candidate_value, envs);
    let baseline_text = normalize_value(baseline_value);
    let candidate_text = normalize_value(candidate_value);
    let hunks = diff_hunks(&baseline_text, &candidate_text, CONTEXT_LINES);

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "case_id": case,
            "attachment_id": attachment,
            "field": field,
            "baseline": baseline_value,
            "candidate": candidate_value,
            "status": result.status,
            "detail": result.detail,
            "hunks": hunks,
        }));
    }

    println!("{}", format!("=== {case} | {attachment} | {field} ===").bold());
    for (env, text) in [(&envs.baseline, &baseline_text), (&envs.candidate, &candidate_text)] {
        println!();
        println!("{}", format!("[{env}]").cyan());
        println!("{text}");
    }
    println!();

    if result.status == Status::Same {
        println!("{}", "identical".green());
        return Ok(());
    }

    if hunks.is_empty() {
        // Fallback detail (e.g. line terminators only) has no hunk body.
        println!("{}", result.detail.yellow());
        return Ok(());
    }

    println!("{}", format!("--- {}", envs.baseline).red().bold());
    println!("{}", format!("+++ {}", envs.candidate).green().bold());
    for hunk in &hunks {
        println!("{}", hunk.header().blue());
        for line in &hunk.lines {
            let text = line.render();
            match line.line_type {
                LineType::Added => println!("{}", text.green()),
                LineType::Removed => println!("{}", text.red()),
                LineType::Context => println!("{text}"),
            }
        }
    }

    Ok(())
}
