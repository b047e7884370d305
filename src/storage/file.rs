//! The Storage File
//!
//! One UTF-8 file holding the whole store as a single JSON object. It is
//! always read in full and written in full; nothing is cached between calls.
//!
//! ```text
//! {
//!   "profile": { "value": { "name": "Ann" }, "timeToLive": false },
//!   "session": { "value": { "token": "abc" }, "timeToLive": 1700000030000 }
//! }
//! ```

use crate::storage::engine::Store;
use crate::storage::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Literal written to a freshly created storage file.
const EMPTY_STORE: &str = "{}";

/// Handle to the storage file at a fixed path.
#[derive(Debug, Clone)]
pub struct StorageFile {
    path: PathBuf,
    atomic: bool,
    pretty: bool,
}

impl StorageFile {
    /// Creates a handle. Performs no I/O.
    pub fn new(path: impl Into<PathBuf>, atomic: bool, pretty: bool) -> Self {
        Self {
            path: path.into(),
            atomic,
            pretty,
        }
    }

    /// Returns the file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current file size in bytes, or None if the file does not
    /// exist.
    pub fn size(&self) -> io::Result<Option<u64>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates parent directories and writes an empty store.
    pub fn bootstrap(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.write_bytes(EMPTY_STORE.as_bytes())?;
        info!(path = %self.path.display(), "Created empty storage file");
        Ok(())
    }

    /// Reads and decodes the whole store, or None if the file does not exist.
    ///
    /// A file containing only whitespace decodes as an empty store.
    pub fn load(&self) -> StorageResult<Option<Store>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Some(Store::new()));
        }

        let store: Store = serde_json::from_str(&contents).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "Storage file is corrupt");
            StorageError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), entries = store.len(), "Loaded store");
        Ok(Some(store))
    }

    /// Encodes the whole store and replaces the file contents with it.
    pub fn persist(&self, store: &Store) -> StorageResult<()> {
        let encoded = self.encode(store)?;
        self.write_encoded(&encoded, store.len())
    }

    /// Encodes the whole store exactly as [`persist`](Self::persist) would
    /// write it.
    pub fn encode(&self, store: &Store) -> StorageResult<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(store)
        } else {
            serde_json::to_vec(store)
        }
        .map_err(io::Error::from)?;
        Ok(encoded)
    }

    /// Replaces the file contents with an already encoded store.
    pub fn write_encoded(&self, encoded: &[u8], entries: usize) -> StorageResult<()> {
        self.write_bytes(encoded)?;
        debug!(
            path = %self.path.display(),
            entries,
            bytes = encoded.len(),
            "Persisted store"
        );
        Ok(())
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        if !self.atomic {
            return fs::write(&self.path, bytes);
        }

        let tmp_path = self.temp_path();
        let result = (|| -> io::Result<()> {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(bytes)?;
            f.flush()?;
            f.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    /// Sibling of the storage file used for write-then-rename.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("storage"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::engine::Entry;
    use crate::storage::expiry::Expiry;
    use serde_json::json;

    fn object(value: serde_json::Value) -> crate::validation::Object {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = StorageFile::new(dir.path().join("absent.json"), true, false);

        assert_eq!(file.size().unwrap(), None);
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_bootstrap_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/storage.json");
        let file = StorageFile::new(&path, true, false);

        file.bootstrap().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(file.size().unwrap(), Some(2));
        assert!(file.load().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let file = StorageFile::new(&path, true, false);

        let mut store = Store::new();
        store.insert(
            "profile".to_string(),
            Entry::new(object(json!({"name": "Ann"})), Expiry::Never),
        );
        store.insert(
            "session".to_string(),
            Entry::new(object(json!({"token": "abc"})), Expiry::At(42)),
        );
        file.persist(&store).unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({
                "profile": {"value": {"name": "Ann"}, "timeToLive": false},
                "session": {"value": {"token": "abc"}, "timeToLive": 42}
            })
        );

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let file = StorageFile::new(&path, true, false);

        file.persist(&Store::new()).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_in_place_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let file = StorageFile::new(&path, false, false);

        file.bootstrap().unwrap();
        file.persist(&Store::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_pretty_output_is_still_one_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let file = StorageFile::new(&path, true, true);

        let mut store = Store::new();
        store.insert(
            "k".to_string(),
            Entry::new(object(json!({"a": 1})), Expiry::Never),
        );
        file.persist(&store).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(file.load().unwrap().unwrap(), store);
    }

    #[test]
    fn test_encode_matches_persisted_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let file = StorageFile::new(&path, true, true);

        let mut store = Store::new();
        store.insert(
            "k".to_string(),
            Entry::new(object(json!({"a": 1})), Expiry::At(7)),
        );
        let encoded = file.encode(&store).unwrap();
        file.persist(&store).unwrap();

        assert_eq!(fs::read(&path).unwrap(), encoded);
        assert_eq!(file.size().unwrap(), Some(encoded.len() as u64));
    }

    #[test]
    fn test_whitespace_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "  \n").unwrap();

        let file = StorageFile::new(&path, true, false);
        assert!(file.load().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let file = StorageFile::new(&path, true, false);
        let err = file.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_reads_files_written_by_other_tools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(
            &path,
            r#"{"profile2":{"value":{"name":"benny1","job":"IT"},"timeToLive":1700000030000}}"#,
        )
        .unwrap();

        let store = StorageFile::new(&path, true, false).load().unwrap().unwrap();
        let entry = &store["profile2"];
        assert_eq!(entry.expires_at, Expiry::At(1_700_000_030_000));
        assert_eq!(entry.value.get("job"), Some(&json!("IT")));
    }
}
