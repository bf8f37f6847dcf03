//! The `run` command: execute explicitly named tasks (and their
//! dependencies).

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::plan;
use super::print_summary;
use crate::runner::Runner;

/// Command to run one or more named tasks.
#[derive(Args)]
pub struct RunCommand {
    /// Names of the tasks to run, as shown by `bindrig list`.
    #[arg(required = true)]
    pub tasks: Vec<String>,
}

impl RunCommand {
    /// Executes the run command.
    pub async fn execute(self, manifest_path: Option<PathBuf>, show_progress: bool) -> Result<()> {
        let graph = plan(manifest_path.as_deref())?;
        let goals = self
            .tasks
            .iter()
            .map(|name| graph.lookup(name))
            .collect::<Result<Vec<_>, _>>()?;

        let summary = Runner::new(show_progress)?.run(&graph, &goals).await?;
        print_summary(&summary);
        Ok(())
    }
}
