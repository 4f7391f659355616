//! Error types shared by all storage backends.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for fallible storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by block storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The block identifier contains characters the backend cannot store
    /// safely (path separators, leading dots, non-ASCII).
    #[error("invalid block id: {id:?}")]
    InvalidId {
        /// The rejected identifier.
        id: String,
    },

    /// An underlying filesystem operation failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path the failed operation touched.
        path: PathBuf,
        /// The originating I/O error.
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Wraps an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
