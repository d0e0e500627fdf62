use std::path::PathBuf;
use tripsplit_application::{RegistryError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ledger file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed member file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} row {row}: invalid {field} '{value}'")]
    InvalidField {
        path: PathBuf,
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("{path}: entry id {id} appears more than once")]
    DuplicateId { path: PathBuf, id: u64 },
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<FileError> for StoreError {
    fn from(err: FileError) -> Self {
        StoreError::backend(err)
    }
}

impl From<FileError> for RegistryError {
    fn from(err: FileError) -> Self {
        RegistryError::backend(err)
    }
}
