//! The `sync` command: materialize everything the manifest declares.
//!
//! The goal set is every extract task and every mirror pull; their
//! dependency closures pull in the downloads, clones, and the build
//! directory bootstrap as needed. On an already materialized tree the
//! whole run is skips.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::plan;
use super::print_summary;
use crate::graph::Action;
use crate::runner::Runner;

/// Command to fetch, extract, and update everything.
#[derive(Args)]
pub struct SyncCommand {}

impl SyncCommand {
    /// Executes the sync command.
    pub async fn execute(self, manifest_path: Option<PathBuf>, show_progress: bool) -> Result<()> {
        let graph = plan(manifest_path.as_deref())?;
        let goals = graph.tasks_matching(|task| {
            matches!(task.action, Action::Extract { .. } | Action::GitPull { .. })
        });

        let summary = Runner::new(show_progress)?.run(&graph, &goals).await?;
        print_summary(&summary);
        Ok(())
    }
}
