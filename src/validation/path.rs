//! Storage path validation.
//!
//! Only the shape of the path is checked here. Whether the file exists, or
//! whether its directory is writable, is left to the first operation that
//! touches the disk.

use std::path::{Component, Path};

/// Longest path accepted, in bytes.
pub const MAX_PATH_BYTES: usize = 4096;

/// Longest single path component accepted, in bytes.
pub const MAX_COMPONENT_BYTES: usize = 255;

#[cfg(windows)]
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Returns true if `candidate` is a syntactically acceptable file path.
pub fn is_valid_path(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_PATH_BYTES || candidate.contains('\0') {
        return false;
    }

    // Must name a file, not a directory
    if candidate.ends_with('/') || candidate.ends_with(std::path::MAIN_SEPARATOR) {
        return false;
    }

    // Components drops a trailing "." so check for it here
    let trailing_dot = format!("{}.", std::path::MAIN_SEPARATOR);
    if candidate.ends_with("/.") || candidate.ends_with(&trailing_dot) {
        return false;
    }

    let path = Path::new(candidate);
    let mut last_is_file_name = false;

    for component in path.components() {
        last_is_file_name = false;
        match component {
            Component::Normal(name) => {
                let Some(name) = name.to_str() else {
                    return false;
                };
                if name.len() > MAX_COMPONENT_BYTES || has_reserved_chars(name) {
                    return false;
                }
                last_is_file_name = true;
            }
            Component::Prefix(_)
            | Component::RootDir
            | Component::CurDir
            | Component::ParentDir => {}
        }
    }

    last_is_file_name
}

#[cfg(windows)]
fn has_reserved_chars(name: &str) -> bool {
    name.chars().any(|c| RESERVED_CHARS.contains(&c) || c.is_control())
}

#[cfg(not(windows))]
fn has_reserved_chars(_name: &str) -> bool {
    false
}
