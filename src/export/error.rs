use std::path::PathBuf;

use thiserror::Error;

use super::ArtifactFormat;

pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that occur while rendering or writing export artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize {format} export: {message}")]
    Serialization {
        format: ArtifactFormat,
        message: String,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn serialization(format: ArtifactFormat, err: impl std::fmt::Display) -> Self {
        ExportError::Serialization {
            format,
            message: err.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::serialization(ArtifactFormat::Csv, err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::serialization(ArtifactFormat::Json, err)
    }
}
