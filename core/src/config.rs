//! Comparison configuration.
//!
//! The field set is always supplied from outside the data (config file or
//! CLI flags), so adding a prompt is a configuration change rather than a code
//! change. Everything here is plain data passed by value to the engine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Prompt result columns compared when no field set is configured.
pub const DEFAULT_FIELDS: &[&str] = &[
    "SoldToCodeExtractor",
    "InputValidator",
    "FlagsProvider",
    "PartNumberInfo",
    "QuantityInfo",
    "CurrencyExtractor",
    "ProjectInfo",
    "ResultValidator",
    "Response",
    "TranslatorZhToEng",
    "TranslatorEngToZh",
    "TranslationValidator",
];

pub const DEFAULT_BASELINE: &str = "NPR";
pub const DEFAULT_CANDIDATE: &str = "Sandbox";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Field '{0}' is listed more than once")]
    DuplicateField(String),
    #[error("Baseline and candidate environments must differ (both are '{0}')")]
    IdenticalEnvironments(String),
}

/// Ordered list of comparable field names.
///
/// Order is significant: comparison and summary tables emit fields in this
/// order. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSet {
    fields: Vec<String>,
}

impl FieldSet {
    pub fn new<I, S>(fields: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if out.contains(&field) {
                return Err(ConfigError::DuplicateField(field));
            }
            out.push(field);
        }
        Ok(Self { fields: out })
    }

    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|&f| f.to_owned()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for FieldSet {
    type Error = ConfigError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSet> for Vec<String> {
    fn from(set: FieldSet) -> Self {
        set.fields
    }
}

/// Environment tags that are paired against each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environments {
    pub baseline: String,
    pub candidate: String,
}

impl Environments {
    pub fn new(baseline: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            baseline: baseline.into(),
            candidate: candidate.into(),
        }
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE, DEFAULT_CANDIDATE)
    }
}

/// Names of the identity columns in the source CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub case_id: String,
    pub attachment_id: String,
    pub environment: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            case_id: "casenumber".to_owned(),
            attachment_id: "attachment_name".to_owned(),
            environment: "environment".to_owned(),
        }
    }
}

/// Full configuration, loadable from a JSON file. Missing keys take defaults.
///
/// ```json
/// {
///   "fields": ["Response", "QuantityInfo"],
///   "environments": { "baseline": "NPR", "candidate": "Sandbox" },
///   "columns": { "case_id": "casenumber" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fields: FieldSet,
    pub environments: Environments,
    pub columns: Columns,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!(
            "[config] Loaded {} field(s) from {}",
            config.fields.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environments.baseline == self.environments.candidate {
            return Err(ConfigError::IdenticalEnvironments(
                self.environments.baseline.clone(),
            ));
        }
        Ok(())
    }
}
