//! The `clean` command: drop every cached archive.
//!
//! Only the downloaded files are removed. Extracted trees and mirror
//! checkouts stay - they are derived state that `sync` regenerates, and
//! the next sync after a clean re-downloads only what extraction actually
//! needs.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::plan;
use super::print_summary;
use crate::graph::Action;
use crate::runner::Runner;

/// Command to delete all cached downloads.
#[derive(Args)]
pub struct CleanCommand {}

impl CleanCommand {
    /// Executes the clean command.
    pub async fn execute(self, manifest_path: Option<PathBuf>, show_progress: bool) -> Result<()> {
        let graph = plan(manifest_path.as_deref())?;
        let goals = graph.tasks_matching(|task| matches!(task.action, Action::RemoveFile { .. }));

        let summary = Runner::new(show_progress)?.run(&graph, &goals).await?;
        print_summary(&summary);
        Ok(())
    }
}
