use serde::Serialize;
use thiserror::Error;

/// Unified error type for envdiff front ends.
///
/// Module errors convert into this enum so callers get one structured,
/// JSON-serializable error shape regardless of which stage failed.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Ingest error: {message}")]
    Ingest { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn ingest(message: impl Into<String>) -> Self {
        Self::Ingest {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::Io(e) => AppError::io(e.to_string()),
            ConfigError::Json(e) => AppError::config(format!("JSON: {e}")),
            other => AppError::config(other.to_string()),
        }
    }
}

impl From<crate::ingest::IngestError> for AppError {
    fn from(err: crate::ingest::IngestError) -> Self {
        use crate::ingest::IngestError;
        match err {
            IngestError::Io(e) => AppError::io(e.to_string()),
            IngestError::Csv(e) => AppError::parse(format!("CSV: {e}")),
            IngestError::MissingColumn { column } => {
                AppError::ingest(format!("Missing required column '{column}'"))
            }
        }
    }
}

impl From<crate::export::ExportError> for AppError {
    fn from(err: crate::export::ExportError) -> Self {
        AppError::export(err.to_string())
    }
}

impl From<crate::labels::storage::LabelStoreError> for AppError {
    fn from(err: crate::labels::storage::LabelStoreError) -> Self {
        use crate::labels::storage::LabelStoreError;
        match err {
            LabelStoreError::Io(e) => AppError::storage(format!("IO: {e}")),
            LabelStoreError::Json(e) => AppError::storage(format!("JSON: {e}")),
            LabelStoreError::VersionConflict { expected, found } => AppError::storage(format!(
                "Version conflict: expected version {expected}, found {found}. Another process modified the labels."
            )),
            LabelStoreError::Central(e) => AppError::storage(e.to_string()),
        }
    }
}

impl From<crate::labels::central::CentralError> for AppError {
    fn from(err: crate::labels::central::CentralError) -> Self {
        AppError::storage(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::export(format!("CSV: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::parse(format!("JSON: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}
