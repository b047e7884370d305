use std::path::PathBuf;

/// Default location of the storage file
pub const DEFAULT_PATH: &str = "data/storage.json";

/// Longest key accepted, in characters
pub const MAX_KEY_CHARS: usize = 32;

/// Largest serialized value accepted, in bytes (16 KiB)
pub const MAX_VALUE_BYTES: usize = 16 * 1024;

/// Largest storage file allowed, in bytes (1 GiB)
pub const MAX_FILE_BYTES: u64 = 1024 * 1024 * 1024;

/// Configuration for a storage engine.
///
/// # Example
///
/// ```rust
/// use jsonkv::StorageConfig;
///
/// let config = StorageConfig::default()
///     .with_path("state/app.json")
///     .with_prune_expired(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Location of the storage file (default: `data/storage.json`)
    pub path: PathBuf,
    /// Longest key accepted, in characters (default: 32)
    pub max_key_chars: usize,
    /// Largest serialized value accepted, in bytes (default: 16 KiB)
    pub max_value_bytes: usize,
    /// Largest storage file allowed, in bytes (default: 1 GiB)
    pub max_file_bytes: u64,
    /// Write through a temporary file and rename it over the target
    /// (default: true)
    pub atomic_writes: bool,
    /// Drop expired entries whenever the file is rewritten (default: false)
    pub prune_expired: bool,
    /// Write indented JSON (default: false)
    pub pretty: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            max_key_chars: MAX_KEY_CHARS,
            max_value_bytes: MAX_VALUE_BYTES,
            max_file_bytes: MAX_FILE_BYTES,
            atomic_writes: true,
            prune_expired: false,
            pretty: false,
        }
    }
}

impl StorageConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage file location
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the longest key accepted, in characters
    pub fn with_max_key_chars(mut self, max: usize) -> Self {
        self.max_key_chars = max;
        self
    }

    /// Sets the largest serialized value accepted, in bytes
    pub fn with_max_value_bytes(mut self, max: usize) -> Self {
        self.max_value_bytes = max;
        self
    }

    /// Sets the largest storage file allowed, in bytes
    ///
    /// `create` checks the current file size against this limit before
    /// writing, so a smaller limit makes the store refuse new entries earlier.
    pub fn with_max_file_bytes(mut self, max: u64) -> Self {
        self.max_file_bytes = max;
        self
    }

    /// Enables or disables write-then-rename persistence
    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    /// Enables or disables dropping expired entries on rewrite
    ///
    /// Reads and deletes treat expired entries as missing either way. With
    /// pruning enabled they are also physically removed the next time
    /// `create` or `delete` rewrites the file.
    pub fn with_prune_expired(mut self, enabled: bool) -> Self {
        self.prune_expired = enabled;
        self
    }

    /// Enables or disables indented JSON output
    pub fn with_pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }
}
