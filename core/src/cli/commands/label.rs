use super::{load_batch, load_report, print_json};
use crate::cli::OutputFormat;
use crate::compare::Report;
use crate::config::{Config, Environments};
use crate::error::AppError;
use crate::ingest::Batch;
use crate::labels::storage;
use crate::labels::{Annotation, Label, LabelKey};
use colored::Colorize;
use std::path::Path;

/// Label and notes of the `label` and `label-cases` commands, as given on
/// the command line.
#[derive(Debug, Default)]
pub struct LabelArgs {
    pub field: String,
    pub label: String,
    pub reason: Option<String>,
    pub standard: Option<String>,
    pub remark: Option<String>,
}

impl LabelArgs {
    /// Parse the label and check the field is compared at all.
    fn validate(&self, config: &Config) -> Result<Label, AppError> {
        let label: Label = self.label.parse().map_err(AppError::parse)?;
        if !config.fields.contains(&self.field) {
            return Err(AppError::not_found(format!(
                "field '{}' in the field set (use 'envdiff fields' to list them)",
                self.field
            )));
        }
        Ok(label)
    }
}

/// Build the annotation for `key`, snapshotting both raw cell texts.
///
/// Fails when either environment has no row for the case/attachment.
fn build_annotation(
    batch: &Batch,
    envs: &Environments,
    key: LabelKey,
    label: Label,
    args: &LabelArgs,
) -> Result<Annotation, AppError> {
    let raw_value = |env: &str| {
        batch
            .find_row(&key.case_id, &key.attachment_id, env)
            .map(|row| row.value(&key.field).unwrap_or_default().to_owned())
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "{env} row for case {} / {} (only matched pairs can be labelled)",
                    key.case_id, key.attachment_id
                ))
            })
    };
    let baseline = raw_value(&envs.baseline)?;
    let candidate = raw_value(&envs.candidate)?;

    let mut annotation = Annotation::new(key, label);
    annotation.acceptable_reason = args.reason.clone().unwrap_or_default();
    annotation.standard_response = args.standard.clone().unwrap_or_default();
    annotation.remark = args.remark.clone().unwrap_or_default();
    annotation.baseline = baseline;
    annotation.candidate = candidate;
    Ok(annotation)
}

/// Keys for `field` of every matched pair belonging to one of `cases`, in
/// report order. Every requested case must have at least one pair.
fn select_cases(report: &Report, cases: &[String], field: &str) -> Result<Vec<LabelKey>, AppError> {
    let keys: Vec<LabelKey> = report
        .comparison
        .iter()
        .filter(|record| cases.contains(&record.case_id))
        .map(|record| LabelKey::new(&record.case_id, &record.attachment_id, field))
        .collect();

    if let Some(missing) = cases
        .iter()
        .find(|case| !keys.iter().any(|key| &key.case_id == *case))
    {
        return Err(AppError::not_found(format!("matched pair for case {missing}")));
    }
    Ok(keys)
}

pub fn run(
    input: &Path,
    case: &str,
    attachment: &str,
    args: &LabelArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    let label = args.validate(config)?;
    let batch = load_batch(input, config)?;

    let key = LabelKey::new(case, attachment, &args.field);
    let annotation = build_annotation(&batch, &config.environments, key.clone(), label, args)?;

    let mut store = storage::load_store(input)?;
    store.set(annotation);
    store.prepare_for_save();
    storage::save_store(input, &store)?;

    if format == OutputFormat::Json {
        return print_json(&store.get(&key));
    }
    println!("{} {key} as {}", "Labelled".green(), label.as_str().bold());
    Ok(())
}

/// Apply one label to a field of every matched pair of the given cases,
/// saving the store once.
pub fn run_cases(
    input: &Path,
    cases: &[String],
    args: &LabelArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), AppError> {
    let label = args.validate(config)?;
    let (batch, report) = load_report(input, config)?;
    let keys = select_cases(&report, cases, &args.field)?;

    let mut store = storage::load_store(input)?;
    for key in &keys {
        store.set(build_annotation(
            &batch,
            &config.environments,
            key.clone(),
            label,
            args,
        )?);
    }
    store.prepare_for_save();
    storage::save_store(input, &store)?;
    log::info!("[labels] Labelled {} field(s) as {label}", keys.len());

    if format == OutputFormat::Json {
        let labelled: Vec<&Annotation> = keys.iter().filter_map(|key| store.get(key)).collect();
        return print_json(&labelled);
    }
    for key in &keys {
        println!("{} {key} as {}", "Labelled".green(), label.as_str().bold());
    }
    println!();
    println!("{} field(s) labelled", keys.len());
    Ok(())
}

pub fn run_clear(
    input: &Path,
    case: &str,
    attachment: &str,
    field: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = LabelKey::new(case, attachment, field);
    let mut store = storage::load_store(input)?;

    let removed = store.clear(&key);
    if removed {
        store.prepare_for_save();
        storage::save_store(input, &store)?;
    }

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "key": key.to_string(),
            "removed": removed,
        }));
    }
    if removed {
        println!("{} {key}", "Removed label".yellow());
    } else {
        println!("No label for {key}");
    }
    Ok(())
}
