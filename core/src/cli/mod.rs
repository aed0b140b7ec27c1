pub mod commands;

use crate::config::{Config, Environments, FieldSet};
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "envdiff")]
#[command(
    author,
    version,
    about = "Compare extraction results between two environments",
    long_about = None
)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON config file (fields, environments, column names)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Field to compare; repeat to build the field set (overrides config)
    #[arg(long = "field", global = true)]
    pub fields: Vec<String>,

    /// Baseline environment tag (overrides config)
    #[arg(long, global = true)]
    pub baseline: Option<String>,

    /// Candidate environment tag (overrides config)
    #[arg(long, global = true)]
    pub candidate: Option<String>,

    /// Override the label storage directory (default: ~/.envdiff/, env: ENVDIFF_HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare every field of every matched pair and summarize
    Compare {
        /// Result rows CSV
        input: PathBuf,

        /// Write the report here (.xlsx, .json, or a directory for CSV)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show both values of one field and their diff
    Show {
        input: PathBuf,
        case: String,
        attachment: String,
        field: String,
    },

    /// Record a correctness label for one field
    Label {
        input: PathBuf,
        case: String,
        attachment: String,
        field: String,
        /// correct, acceptable or wrong
        label: String,

        /// Why a differing value is still acceptable
        #[arg(long)]
        reason: Option<String>,

        /// The expected (standard) response
        #[arg(long)]
        standard: Option<String>,

        #[arg(long)]
        remark: Option<String>,
    },

    /// Apply one label to a field of every matched pair of the given cases
    LabelCases {
        input: PathBuf,
        field: String,
        /// correct, acceptable or wrong
        label: String,

        /// Case to label; repeat for several cases
        #[arg(long = "case", required = true)]
        cases: Vec<String>,

        /// Why a differing value is still acceptable
        #[arg(long)]
        reason: Option<String>,

        /// The expected (standard) response
        #[arg(long)]
        standard: Option<String>,

        #[arg(long)]
        remark: Option<String>,
    },

    /// Remove the label of one field
    Unlabel {
        input: PathBuf,
        case: String,
        attachment: String,
        field: String,
    },

    /// List labels and validation progress (all batches if no input)
    Labels {
        input: Option<PathBuf>,

        /// Export the labels of this batch as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show row, pair and label counts for a batch
    Stats { input: PathBuf },

    /// Print the effective field set
    Fields,
}

impl Cli {
    /// Build the effective configuration: config file (or defaults), then
    /// command-line overrides.
    pub fn load_config(&self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if !self.fields.is_empty() {
            config.fields = FieldSet::new(self.fields.iter().cloned())?;
        }
        if let Some(baseline) = &self.baseline {
            config.environments.baseline.clone_from(baseline);
        }
        if let Some(candidate) = &self.candidate {
            config.environments.candidate.clone_from(candidate);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Resolve a potentially relative path to an absolute one.
fn resolve_absolute(path: &Path) -> Result<PathBuf, AppError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<(), AppError> {
    // Set ENVDIFF_HOME early so all storage calls use the override
    if let Some(home) = &cli.home {
        let absolute = resolve_absolute(home)?;
        std::env::set_var(crate::labels::central::HOME_ENV, &absolute);
    }

    let config = cli.load_config()?;
    let format = cli.format;

    match cli.command {
        Commands::Compare { input, output } => {
            commands::compare::run(&input, output.as_deref(), &config, format)
        }
        Commands::Show {
            input,
            case,
            attachment,
            field,
        } => commands::show::run(&input, &case, &attachment, &field, &config, format),
        Commands::Label {
            input,
            case,
            attachment,
            field,
            label,
            reason,
            standard,
            remark,
        } => commands::label::run(
            &input,
            &case,
            &attachment,
            &commands::label::LabelArgs {
                field,
                label,
                reason,
                standard,
                remark,
            },
            &config,
            format,
        ),
        Commands::LabelCases {
            input,
            field,
            label,
            cases,
            reason,
            standard,
            remark,
        } => commands::label::run_cases(
            &input,
            &cases,
            &commands::label::LabelArgs {
                field,
                label,
                reason,
                standard,
                remark,
            },
            &config,
            format,
        ),
        Commands::Unlabel {
            input,
            case,
            attachment,
            field,
        } => commands::label::run_clear(&input, &case, &attachment, &field, format),
        Commands::Labels { input, export } => {
            commands::labels::run(input.as_deref(), export.as_deref(), &config, format)
        }
        Commands::Stats { input } => commands::stats::run(&input, &config, format),
        Commands::Fields => commands::fields::run(&config, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_compare() {
        let cli = parse(&["envdiff", "compare", "rows.csv", "-o", "out.xlsx"]);
        match cli.command {
            Commands::Compare { input, output } => {
                assert_eq!(input, PathBuf::from("rows.csv"));
                assert_eq!(output, Some(PathBuf::from("out.xlsx")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_field_flags_override_defaults() {
        let cli = parse(&[
            "envdiff", "--field", "Response", "--field", "QuantityInfo", "fields",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(
            config.fields.as_slice().to_vec(),
            vec!["Response", "QuantityInfo"]
        );
    }

    #[test]
    fn test_duplicate_field_flag_rejected() {
        let cli = parse(&["envdiff", "--field", "A", "--field", "A", "fields"]);
        assert!(matches!(cli.load_config(), Err(AppError::Config { .. })));
    }

    #[test]
    fn test_environment_overrides() {
        let cli = parse(&["envdiff", "--candidate", "Staging", "fields"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.environments, Environments::new("NPR", "Staging"));

        let cli = parse(&["envdiff", "--candidate", "NPR", "fields"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_parse_label_with_options() {
        let cli = parse(&[
            "envdiff",
            "label",
            "rows.csv",
            "100",
            "a.pdf",
            "Response",
            "acceptable",
            "--reason",
            "formatting only",
        ]);
        match cli.command {
            Commands::Label { label, reason, .. } => {
                assert_eq!(label, "acceptable");
                assert_eq!(reason.as_deref(), Some("formatting only"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_label_cases() {
        let cli = parse(&[
            "envdiff",
            "label-cases",
            "rows.csv",
            "Response",
            "wrong",
            "--case",
            "100",
            "--case",
            "200",
            "--remark",
            "missing quantity",
        ]);
        match cli.command {
            Commands::LabelCases {
                field,
                label,
                cases,
                remark,
                ..
            } => {
                assert_eq!(field, "Response");
                assert_eq!(label, "wrong");
                assert_eq!(cases, vec!["100", "200"]);
                assert_eq!(remark.as_deref(), Some("missing quantity"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_label_cases_requires_a_case() {
        let result = Cli::try_parse_from(["envdiff", "label-cases", "rows.csv", "Response", "wrong"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_input_is_an_io_app_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = parse(&[
            "envdiff",
            "stats",
            dir.path().join("missing.csv").to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Io");
    }
}
