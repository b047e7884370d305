//! # jsonkv - A File-Backed JSON Key-Value Store
//!
//! jsonkv is a small, embeddable key-value store that keeps its whole state in
//! one JSON file. It is meant for applications that need a little durable
//! state without running a database server.
//!
//! ## Features
//!
//! - **One file**: the store is a single JSON object, readable by any tool
//! - **JSON values**: every value is a JSON object of up to 16 KiB
//! - **TTL Support**: entries can expire after a number of seconds
//! - **Insert-only create**: existing keys are never silently overwritten
//! - **Synchronous**: no runtime, no background threads
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              jsonkv                                     │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────────────────┐  │
//! │  │   Caller    │───>│ Validation  │───>│       StorageEngine         │  │
//! │  │ (lib / CLI) │    │ path / args │    │  load ─> mutate ─> persist  │  │
//! │  └─────────────┘    └─────────────┘    └──────────────┬──────────────┘  │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                        ┌─────────────────────────────┐  │
//! │                                        │   StorageFile (JSON, 1 GiB) │  │
//! │                                        └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use jsonkv::{StorageEngine, StorageError};
//! use serde_json::json;
//!
//! fn main() -> Result<(), StorageError> {
//!     // Defaults to data/storage.json
//!     let engine = StorageEngine::new()?;
//!
//!     // Expires after 30 seconds
//!     engine.create("profile2", json!({"name": "benny1", "job": "IT"}), 30)?;
//!
//!     match engine.read("profile2") {
//!         Ok(outcome) => println!("Value => {:?}", outcome.value),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!
//!     engine.delete("profile2")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: the engine, its configuration, the storage file and expiry
//! - [`validation`]: path and argument checks
//!
//! ## Design Highlights
//!
//! ### Load, Mutate, Persist
//!
//! Each operation reads the whole file, works on an in-memory map and, if it
//! changed anything, writes the whole map back. Nothing is cached between
//! calls. There is no locking either, so concurrent writers can overwrite
//! each other's changes.
//!
//! ### Lazy Expiry
//!
//! Deadlines are only checked when a key is read or deleted. An expired key
//! is reported as [`StorageError::KeyNotFound`]; it stays in the file unless
//! [`StorageConfig::prune_expired`] is enabled and a later write drops it.

pub mod storage;
pub mod validation;

// Re-export commonly used types for convenience
pub use storage::{
    ErrorKind, Expiry, Outcome, StorageConfig, StorageEngine, StorageError, StorageResult,
    DEFAULT_PATH,
};
pub use validation::{Object, Ttl};

/// Version of jsonkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
