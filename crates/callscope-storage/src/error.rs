//! Error types for callscope-storage

use callscope_core::AnalysisError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<StorageError> for AnalysisError {
    fn from(err: StorageError) -> Self {
        AnalysisError::Storage(err.to_string())
    }
}
