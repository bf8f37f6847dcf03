//! Filesystem primitives shared by the task runner.
//!
//! These are the only filesystem operations the tool performs outside of
//! streaming download bodies and unpacking archives: recursive directory
//! creation and delete-if-present. Both are safe to repeat, which keeps
//! every task body idempotent even when the executor re-runs a partially
//! failed build.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Removes a file if it exists, reporting whether anything was removed.
/// An already-absent file is a successful no-op, never an error.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Repeating is a no-op.
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn ensure_dir_rejects_file_at_path() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("occupied");
        std::fs::write(&file, "x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn remove_file_if_exists_reports_whether_it_removed() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("cached.zip");
        std::fs::write(&file, "data").unwrap();

        assert!(remove_file_if_exists(&file).unwrap());
        assert!(!file.exists());
        // Second removal is a successful no-op.
        assert!(!remove_file_if_exists(&file).unwrap());
    }
}
