//! Input Validation
//!
//! Checks that run before the engine touches the disk.
//!
//! - [`path`]: is a storage location syntactically usable? Runs once, when an
//!   engine is built.
//! - [`args`]: key, value and TTL checks for each operation.

pub mod args;
pub mod path;

pub use args::{validate_key, validate_ttl, validate_value, Object, Ttl};
pub use path::is_valid_path;
