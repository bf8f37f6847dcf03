//! The `list` command: show every task the manifest plans, grouped by
//! label.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::common::plan;

/// Command to list all planned tasks.
#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    /// Executes the list command.
    pub fn execute(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let graph = plan(manifest_path.as_deref())?;

        let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (_, task) in graph.iter() {
            let group = task.group.clone().unwrap_or_else(|| "other".to_string());
            grouped.entry(group).or_default().push(&task.name);
        }

        let mut total = 0;
        for (group, names) in &grouped {
            println!("{}", group.bold());
            for name in names {
                println!("  {name}");
                total += 1;
            }
            println!();
        }
        println!("{total} tasks");
        Ok(())
    }
}
