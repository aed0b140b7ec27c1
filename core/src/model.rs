use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Natural key of one comparable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub case_id: String,
    pub attachment_id: String,
}

impl Identity {
    pub fn new(case_id: impl Into<String>, attachment_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            attachment_id: attachment_id.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.case_id, self.attachment_id)
    }
}

/// One extraction result row, as produced by a single environment.
///
/// Field values are raw text. A field that is missing from `values` is
/// treated as an empty value by the comparison engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub case_id: String,
    pub attachment_id: String,
    pub environment: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl Row {
    pub fn new(
        case_id: impl Into<String>,
        attachment_id: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            attachment_id: attachment_id.into(),
            environment: environment.into(),
            values: HashMap::new(),
        }
    }

    /// Builder-style setter, mostly used by tests and ingestion.
    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.case_id.clone(), self.attachment_id.clone())
    }
}
