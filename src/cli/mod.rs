//! Command-line interface for bindrig.
//!
//! Each command lives in its own module with its own argument struct and
//! an `execute` method; this module holds the top-level [`Cli`] parser,
//! the global flags every command inherits, and the dispatch into the
//! command implementations.
//!
//! # Commands
//!
//! - `list` - show every planned task, grouped by label
//! - `sync` - fetch, extract, and update everything the manifest declares
//! - `run` - execute explicitly named tasks and their dependencies
//! - `clean` - delete cached archives (extracted output stays)
//! - `validate` - check the manifest and plan the graph without running
//!
//! # Global options
//!
//! - `--manifest-path` - explicit path to `bindrig.toml` instead of the
//!   upward search from the current directory
//! - `--verbose` / `--quiet` - log verbosity (mutually exclusive)
//! - `--no-progress` - plain output for CI logs and non-ANSI terminals

pub mod common;

mod clean;
mod list;
mod run;
mod sync;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::runner::RunSummary;

/// Top-level argument parser.
#[derive(Parser)]
#[command(
    name = "bindrig",
    about = "Fetches prebuilt binaries and header mirrors for native-binding builds",
    version,
    long_about = "bindrig plans an idempotent task graph from bindrig.toml - downloads, \
                  archive extractions, and git mirror updates - and executes the parts you ask for. \
                  Tasks that are already satisfied are skipped, so repeated runs are cheap."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the manifest file (bindrig.toml). Defaults to searching
    /// the current directory and its parents.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,

    /// Disable progress bars.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List all planned tasks, grouped by label
    List(list::ListCommand),
    /// Fetch, extract, and update everything the manifest declares
    Sync(sync::SyncCommand),
    /// Run one or more named tasks (and their dependencies)
    Run(run::RunCommand),
    /// Delete cached archives; extracted output is left in place
    Clean(clean::CleanCommand),
    /// Validate the manifest and plan the graph without executing
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Log filter directive derived from the verbosity flags, used when
    /// `RUST_LOG` is not set.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "bindrig=debug"
        } else if self.quiet {
            "bindrig=error"
        } else {
            "bindrig=info"
        }
    }

    /// Dispatches to the selected command.
    pub async fn execute(self) -> Result<()> {
        let show_progress = !self.no_progress && !self.quiet;
        match self.command {
            Commands::List(cmd) => cmd.execute(self.manifest_path),
            Commands::Sync(cmd) => cmd.execute(self.manifest_path, show_progress).await,
            Commands::Run(cmd) => cmd.execute(self.manifest_path, show_progress).await,
            Commands::Clean(cmd) => cmd.execute(self.manifest_path, show_progress).await,
            Commands::Validate(cmd) => cmd.execute(self.manifest_path),
        }
    }
}

/// Prints the one-line result of a completed run.
fn print_summary(summary: &RunSummary) {
    println!(
        "{} {} executed, {} up to date",
        "✓".green().bold(),
        summary.executed.len(),
        summary.skipped.len()
    );
}
