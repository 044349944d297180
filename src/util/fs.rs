//! Filesystem helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a file to string, with nice error messages.
///
/// Non-UTF-8 content surfaces as an error here rather than being
/// lossily converted.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Check whether `path` names a regular file this process can open
/// for reading.
pub fn is_readable(path: &Path) -> bool {
    match fs::File::open(path) {
        Ok(file) => file.metadata().map(|m| m.is_file()).unwrap_or(false),
        Err(_) => false,
    }
}
