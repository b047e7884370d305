//! Storage Engine Module
//!
//! This module provides the core storage functionality for jsonkv: a
//! key-value store persisted as one JSON file, with per-entry TTL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     StorageEngine                           │
//! │   create / read / delete      StorageConfig (limits)        │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ load / persist (whole file)
//!                            ▼
//!              ┌───────────────────────────┐
//!              │       StorageFile         │
//!              │  data/storage.json        │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Whole-file persistence**: every mutation rewrites the full store
//! - **Atomic rewrite**: write-then-rename by default
//! - **TTL Support**: entries can carry an absolute expiry deadline
//! - **Lazy Expiry**: expired keys are invisible to reads and deletes
//! - **Size limits**: 32-character keys, 16 KiB values, 1 GiB files
//!
//! ## Example
//!
//! ```no_run
//! use jsonkv::storage::{StorageConfig, StorageEngine};
//! use serde_json::json;
//!
//! let engine = StorageEngine::with_config(
//!     StorageConfig::default().with_path("data/storage.json"),
//! )
//! .unwrap();
//!
//! engine.create("name", json!({"first": "Ariz"}), 0).unwrap();
//! let value = engine.read("name").unwrap().into_value();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod expiry;
pub mod file;

// Re-export commonly used types
pub use config::{StorageConfig, DEFAULT_PATH, MAX_FILE_BYTES, MAX_KEY_CHARS, MAX_VALUE_BYTES};
pub use engine::{Entry, Outcome, StorageEngine, Store};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use expiry::Expiry;
pub use file::StorageFile;
