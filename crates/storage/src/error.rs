//! Storage errors.

use sampleqc_core::QcError;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while writing result files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: std::path::PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl From<StoreError> for QcError {
    fn from(err: StoreError) -> Self {
        QcError::Output { message: err.to_string() }
    }
}
