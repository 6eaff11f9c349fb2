use std::path::PathBuf;

use thiserror::Error;

pub type CoinlensResult<T> = Result<T, CoinlensError>;

#[derive(Debug, Error)]
pub enum CoinlensError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to parsing, schema reconciliation and querying market data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Missing canonical column '{0}'")]
    MissingColumn(String),

    #[error("Ambiguous base volume columns: {0:?}")]
    AmbiguousVolumeColumn(Vec<String>),

    #[error("Column '{column}' contains {count} null value(s)")]
    NullValues { column: String, count: usize },

    #[error("Invalid date string: '{0}'")]
    InvalidDate(String),

    #[error("Data frame error: {0}")]
    DataFrame(String),
}

/// Errors related to file system access and serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("Directory '{path}' is missing or unreadable: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Failed to read data: {0}")]
    ReadFailed(String),

    #[error("Failed to write data: {0}")]
    WriteFailed(String),
}

/// Errors related to internal system invariants.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

pub(crate) fn polars_err(ctx: &str, e: polars::error::PolarsError) -> CoinlensError {
    CoinlensError::Data(DataError::DataFrame(format!("{ctx}: {e}")))
}
