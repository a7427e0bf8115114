//! Error types for cache backends.

use std::path::PathBuf;

/// Errors that can occur when talking to a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The connection was closed explicitly.
    #[error("store connection is closed")]
    Closed,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The encoded result does not fit in the result column.
    #[error("record for {key} is too large: {size} bytes (max {max})")]
    RecordTooLarge { key: String, size: usize, max: usize },

    /// A stored record could not be read back.
    #[error("corrupt record at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The record changed underneath a find-or-create.
    #[error("record for {key} was removed during write")]
    Conflict { key: String },

    /// The probe did not answer in time.
    #[error("operation timed out after {millis}ms")]
    Timeout { millis: u64 },
}

impl StoreError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new corrupt record error.
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
