use super::{load_report, percent, print_json};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::AppError;
use crate::labels::{storage, Label, LabelStore};
use colored::Colorize;
use std::fs::File;
use std::path::Path;

pub fn run(
    input: Option<&Path>,
    export: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    match input {
        Some(input) => run_batch(input, export, config, format),
        None if export.is_some() => Err(AppError::config("--export needs an input batch")),
        None => run_global(format),
    }
}

fn run_global(format: OutputFormat) -> Result<(), AppError> {
    let stores = storage::list_stores()?;

    if format == OutputFormat::Json {
        return print_json(&stores);
    }

    if stores.is_empty() {
        println!("No saved labels");
        return Ok(());
    }

    for store in &stores {
        let date = store.updated_at.get(..10).unwrap_or(&store.updated_at);
        println!(
            "  {:<30} {:>5} label(s)  {}  {}",
            store.name,
            store.labelled,
            date,
            store.path.dimmed()
        );
    }
    println!();
    println!("Total: {} batch(es)", stores.len());
    Ok(())
}

fn run_batch(
    input: &Path,
    export: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (_, report) = load_report(input, config)?;
    let store = storage::load_store(input)?;
    let progress = store.progress(report.cell_count());

    if let Some(path) = export {
        let file = File::create(path)?;
        store.write_csv(file, &config.environments)?;
        log::info!("[labels] Exported {} label(s) to {}", store.len(), path.display());
    }

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "progress": progress,
            "annotations": store.annotations,
        }));
    }

    print_annotations(&store);
    println!();
    println!(
        "Validated {}/{} ({}%), {} remaining",
        progress.validated,
        progress.total,
        percent(progress.validated, progress.total),
        progress.remaining
    );
    if let Some(path) = export {
        println!("Exported to {}", path.display());
    }
    Ok(())
}

fn print_annotations(store: &LabelStore) {
    if store.is_empty() {
        println!("No labels yet");
        return;
    }
    for annotation in &store.annotations {
        let label = match annotation.label {
            Label::Correct => annotation.label.as_str().green(),
            Label::Acceptable => annotation.label.as_str().yellow(),
            Label::Wrong => annotation.label.as_str().red(),
        };
        let mut line = format!("  {:<10} {}", label, annotation.key);
        if !annotation.acceptable_reason.is_empty() {
            line.push_str(&format!("  ({})", annotation.acceptable_reason));
        }
        if !annotation.remark.is_empty() {
            line.push_str(&format!("  # {}", annotation.remark));
        }
        println!("{line}");
    }
}
