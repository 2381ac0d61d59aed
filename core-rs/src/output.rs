//! Output file handling shared by every operation
//!
//! Artifacts are rendered fully in memory and written in one call, so a
//! failed operation never leaves a truncated file behind.

use std::fs;
use std::path::Path;

use crate::errors::{Result, SemtagError};

/// Write `contents` to `path`, replacing any existing file.
///
/// The parent directory must already exist.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(SemtagError::NotFound(format!(
                "Output directory not found: {}",
                parent.display()
            )));
        }
    }

    fs::write(path, contents)?;
    Ok(())
}
