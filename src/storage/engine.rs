//! File-Backed Storage Engine with Expiry Support
//!
//! This module implements the core storage engine for jsonkv. Every
//! operation runs one explicit cycle against the storage file:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │ validate │───>│   load   │───>│  mutate  │───>│ persist  │
//! │   args   │    │ (full)   │    │ (memory) │    │ (full)   │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Reads stop after `load`. Nothing is cached between calls, so the file is
//! the single source of truth.
//!
//! ## Design Decisions
//!
//! 1. **Insert-only create**: `create` refuses to overwrite an existing key.
//! 2. **Lazy Expiry**: deadlines are checked on read and delete. An expired
//!    key reports [`StorageError::KeyNotFound`], exactly like a missing one.
//! 3. **No locking**: two writers interleaving their load/persist cycles can
//!    lose updates. The engine is meant for a single writer.

use crate::storage::expiry::{self, Expiry};
use crate::storage::file::StorageFile;
use crate::storage::{StorageConfig, StorageError, StorageResult};
use crate::validation::{self, Object, Ttl};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Represents a stored value with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The stored JSON object
    pub value: Object,
    /// When this entry stops being visible
    #[serde(rename = "timeToLive", default, with = "expiry::time_to_live")]
    pub expires_at: Expiry,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(value: Object, expires_at: Expiry) -> Self {
        Self { value, expires_at }
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_expired()
    }
}

/// The complete mapping of keys to entries.
pub type Store = HashMap<String, Entry>;

/// Successful result of an engine operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The retrieved value, for reads
    pub value: Option<Object>,
    /// Human-readable confirmation
    pub message: String,
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            value: None,
            message: message.into(),
        }
    }

    fn with_value(value: Object, message: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            message: message.into(),
        }
    }

    /// Consumes the outcome and returns the retrieved value, if any.
    pub fn into_value(self) -> Option<Object> {
        self.value
    }
}

/// The main storage engine for jsonkv.
///
/// Holds only a path and its configuration; the engine is cheap to clone
/// and every call goes back to the file.
///
/// # Example
///
/// ```
/// use jsonkv::StorageEngine;
/// use serde_json::json;
///
/// # fn main() -> Result<(), jsonkv::StorageError> {
/// # let dir = tempfile::tempdir()?;
/// # let path = dir.path().join("storage.json");
/// let engine = StorageEngine::open(path.to_str().unwrap())?;
///
/// // Store a value that never expires
/// engine.create("profile", json!({"name": "Ann"}), 0)?;
///
/// // Read it back
/// let outcome = engine.read("profile")?;
/// assert_eq!(outcome.value.unwrap()["name"], "Ann");
///
/// // Store a value that expires after 30 seconds
/// engine.create("session", json!({"token": "abc123"}), 30)?;
///
/// engine.delete("profile")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StorageEngine {
    config: StorageConfig,
    file: StorageFile,
}

impl StorageEngine {
    /// Creates an engine on the default path, `data/storage.json`.
    pub fn new() -> StorageResult<Self> {
        Self::with_config(StorageConfig::default())
    }

    /// Creates an engine on `path` with default limits.
    ///
    /// Fails with [`StorageError::PathInvalid`] if the path is not
    /// syntactically usable. No I/O happens here.
    pub fn open(path: &str) -> StorageResult<Self> {
        Self::with_config(StorageConfig::default().with_path(path))
    }

    /// Creates an engine from a full configuration.
    pub fn with_config(config: StorageConfig) -> StorageResult<Self> {
        let path = config.path.to_string_lossy();
        if config.path.to_str().is_none() || !validation::is_valid_path(&path) {
            return Err(StorageError::PathInvalid(path.into_owned()));
        }

        let file = StorageFile::new(&config.path, config.atomic_writes, config.pretty);
        debug!(path = %config.path.display(), "Storage engine configured");
        Ok(Self { config, file })
    }

    /// Returns the storage file location.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Stores `value` under a new `key`.
    ///
    /// Arguments are checked in order (key, value, TTL) and the first
    /// failure is returned. A TTL of zero never expires. The storage file and
    /// its parent directories are created on first use.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidKey`], [`StorageError::InvalidValue`],
    ///   [`StorageError::InvalidTtl`] for bad arguments
    /// - [`StorageError::CapacityExceeded`] if the file is, or would become,
    ///   larger than the configured maximum
    /// - [`StorageError::KeyExists`] if the key is already stored
    pub fn create(&self, key: &str, value: Value, ttl: impl Into<Ttl>) -> StorageResult<Outcome> {
        let ttl = ttl.into();
        validation::validate_key(key, self.config.max_key_chars)?;
        let (value, value_bytes) = validation::validate_value(value, self.config.max_value_bytes)?;
        let ttl = validation::validate_ttl(&ttl)?;

        self.reserve(key, value_bytes)?;

        let mut store = self.file.load()?.unwrap_or_default();
        if store.contains_key(key) {
            debug!(key, "Create rejected, key exists");
            return Err(StorageError::KeyExists(key.to_string()));
        }

        let expires_at = ttl.map(Expiry::after).unwrap_or(Expiry::Never);
        store.insert(key.to_string(), Entry::new(value, expires_at));
        self.write(&mut store, Some(self.config.max_file_bytes))?;

        debug!(key, ?expires_at, "Created entry");
        Ok(Outcome::message(format!("Value for key '{key}' created successfully")))
    }

    /// Gets the value for `key`.
    ///
    /// An expired entry is reported as [`StorageError::KeyNotFound`] and left
    /// in place.
    pub fn read(&self, key: &str) -> StorageResult<Outcome> {
        validation::validate_key(key, self.config.max_key_chars)?;

        let store = self.load_existing()?;
        let entry = live_entry(&store, key)?;

        debug!(key, remaining_ms = ?entry.expires_at.remaining_ms(), "Read entry");
        Ok(Outcome::with_value(
            entry.value.clone(),
            format!("Value for key '{key}' read successfully"),
        ))
    }

    /// Deletes `key` and rewrites the file.
    ///
    /// An expired entry is reported as [`StorageError::KeyNotFound`] and the
    /// file is not touched.
    pub fn delete(&self, key: &str) -> StorageResult<Outcome> {
        validation::validate_key(key, self.config.max_key_chars)?;

        let mut store = self.load_existing()?;
        live_entry(&store, key)?;

        store.remove(key);
        self.write(&mut store, None)?;

        debug!(key, "Deleted entry");
        Ok(Outcome::message(format!("Value for key '{key}' deleted successfully")))
    }

    /// Checks the size budget for a new value, creating the file if needed.
    fn reserve(&self, key: &str, value_bytes: usize) -> StorageResult<()> {
        let max = self.config.max_file_bytes;

        match self.file.size()? {
            Some(size) if size > max => {
                warn!(key, size, max, "Storage file is already over its size limit");
                Err(StorageError::capacity(format!(
                    "file size has already reached the limit ({size} of {max} bytes)"
                )))
            }
            Some(size) if size.saturating_add(value_bytes as u64) > max => {
                warn!(key, size, value_bytes, max, "Value would push storage file over its size limit");
                Err(StorageError::capacity(format!(
                    "file size would exceed the limit ({size} + {value_bytes} of {max} bytes)"
                )))
            }
            Some(_) => Ok(()),
            None => Ok(self.file.bootstrap()?),
        }
    }

    fn load_existing(&self) -> StorageResult<Store> {
        self.file
            .load()?
            .ok_or_else(|| StorageError::NoDataAvailable(self.path_string()))
    }

    /// Rewrites the file with `store`, refusing if the encoded store would
    /// be larger than `limit`.
    fn write(&self, store: &mut Store, limit: Option<u64>) -> StorageResult<()> {
        if self.config.prune_expired {
            let now = expiry::now_millis();
            let before = store.len();
            store.retain(|_, entry| !entry.expires_at.is_expired_at(now));
            let pruned = before - store.len();
            if pruned > 0 {
                debug!(pruned, "Pruned expired entries");
            }
        }

        let encoded = self.file.encode(store)?;
        if let Some(max) = limit {
            let size = encoded.len() as u64;
            if size > max {
                warn!(size, max, "Encoded store would push storage file over its size limit");
                return Err(StorageError::capacity(format!(
                    "file size would exceed the limit ({size} of {max} bytes once written)"
                )));
            }
        }
        self.file.write_encoded(&encoded, store.len())
    }

    fn path_string(&self) -> String {
        self.file.path().display().to_string()
    }
}

/// Looks up `key`, treating an expired entry as missing.
fn live_entry<'a>(store: &'a Store, key: &str) -> StorageResult<&'a Entry> {
    match store.get(key) {
        Some(entry) if entry.is_expired() => {
            debug!(key, "Entry has expired");
            Err(StorageError::KeyNotFound(key.to_string()))
        }
        Some(entry) => Ok(entry),
        None => Err(StorageError::KeyNotFound(key.to_string())),
    }
}
