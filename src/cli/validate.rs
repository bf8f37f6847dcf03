//! The `validate` command: check the manifest and plan the graph without
//! executing anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{load_manifest, plan};

/// Command to validate the manifest.
#[derive(Args)]
pub struct ValidateCommand {}

impl ValidateCommand {
    /// Executes the validate command.
    pub fn execute(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let (manifest, _) = load_manifest(manifest_path.as_deref())?;
        manifest.validate()?;
        // Planning catches what validation alone cannot, e.g. distinct
        // artifacts whose coordinates collide on a generated task name.
        let graph = plan(manifest_path.as_deref())?;

        println!(
            "{} manifest is valid ({} tasks planned)",
            "✓".green().bold(),
            graph.iter().count()
        );
        Ok(())
    }
}
