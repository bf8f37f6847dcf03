//! Shared plumbing for CLI commands: manifest discovery and graph
//! planning.

use crate::graph::TaskGraph;
use crate::manifest::Manifest;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Loads the manifest from an explicit path or by searching upward from
/// the current directory. Returns the manifest and the directory it was
/// loaded from (which the build directory is resolved against).
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<(Manifest, PathBuf)> {
    let path = match manifest_path {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("Failed to determine current directory")?;
            Manifest::find_from(&cwd)?
        }
    };
    let manifest = Manifest::load(&path)?;
    let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    Ok((manifest, root))
}

/// Plans the full task graph from the manifest.
pub fn plan(manifest_path: Option<&Path>) -> Result<TaskGraph> {
    let (manifest, root) = load_manifest(manifest_path)?;
    let workspace = Workspace::from_manifest(&manifest, &root)?;
    Ok(workspace.into_graph())
}
