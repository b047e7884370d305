//! Storage Errors
//!
//! Every engine operation returns [`StorageResult`]. Validation and business
//! rule failures each get their own variant; filesystem failures are passed
//! through untouched in [`StorageError::Io`].

use std::io;
use thiserror::Error;

/// Errors returned by the storage engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The configured storage location is not a usable file path
    #[error("not a valid storage path: {0:?}")]
    PathInvalid(String),

    /// Key is empty or longer than the configured maximum
    #[error("not a valid key: {reason}")]
    InvalidKey { reason: String },

    /// Value is not a JSON object or is too large once serialized
    #[error("not a valid value: {reason}")]
    InvalidValue { reason: String },

    /// Time-to-live is not a finite, non-negative whole number of seconds
    #[error("not a valid time-to-live: {reason}")]
    InvalidTtl { reason: String },

    /// The storage file is, or would become, larger than allowed
    #[error("capacity exceeded: {reason}")]
    CapacityExceeded { reason: String },

    /// `create` never overwrites
    #[error("key already exists: {0}")]
    KeyExists(String),

    /// The key was never stored, was deleted, or has expired
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// No storage file has been created yet
    #[error("no data available at {0}")]
    NoDataAvailable(String),

    /// The storage file does not hold a JSON object of entries
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure, not reclassified
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Fieldless discriminant of [`StorageError`], handy for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PathInvalid,
    InvalidKey,
    InvalidValue,
    InvalidTtl,
    CapacityExceeded,
    KeyExists,
    KeyNotFound,
    NoDataAvailable,
    Corrupt,
    Io,
}

impl StorageError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::PathInvalid(_) => ErrorKind::PathInvalid,
            StorageError::InvalidKey { .. } => ErrorKind::InvalidKey,
            StorageError::InvalidValue { .. } => ErrorKind::InvalidValue,
            StorageError::InvalidTtl { .. } => ErrorKind::InvalidTtl,
            StorageError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            StorageError::KeyExists(_) => ErrorKind::KeyExists,
            StorageError::KeyNotFound(_) => ErrorKind::KeyNotFound,
            StorageError::NoDataAvailable(_) => ErrorKind::NoDataAvailable,
            StorageError::Corrupt { .. } => ErrorKind::Corrupt,
            StorageError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_key(reason: impl Into<String>) -> Self {
        StorageError::InvalidKey {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value(reason: impl Into<String>) -> Self {
        StorageError::InvalidValue {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_ttl(reason: impl Into<String>) -> Self {
        StorageError::InvalidTtl {
            reason: reason.into(),
        }
    }

    pub(crate) fn capacity(reason: impl Into<String>) -> Self {
        StorageError::CapacityExceeded {
            reason: reason.into(),
        }
    }
}
