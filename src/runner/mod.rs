//! Executor for frozen task graphs.
//!
//! The [`Runner`] is the consumer side of the descriptor records the
//! workspace produces: it resolves the goal closure, walks it in
//! topological order, evaluates each task's precondition against the
//! live filesystem, and either performs the described action or records
//! the skip. Skips are successful no-ops - on a fully materialized build
//! directory an entire run executes nothing.
//!
//! Execution is sequential and fail-fast: the first failing task aborts
//! the run with an error naming it, and nothing is retried. Because every
//! action is idempotent and every precondition is re-evaluated on the next
//! run, re-running after a partial failure resumes exactly where the
//! failure happened.

use crate::constants::{DOWNLOAD_TIMEOUT, DOWNLOAD_USER_AGENT};
use crate::core::BindrigError;
use crate::git::GitCommand;
use crate::graph::{Action, Task, TaskGraph, TaskId};
use crate::utils::fs::{ensure_dir, remove_file_if_exists};
use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// What happened to each task of a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Names of tasks whose action ran, in execution order.
    pub executed: Vec<String>,
    /// Names of tasks skipped by their precondition, in execution order.
    pub skipped: Vec<String>,
}

/// Sequential task executor.
pub struct Runner {
    client: reqwest::Client,
    show_progress: bool,
}

impl Runner {
    /// Creates a runner. Progress bars are drawn only when
    /// `show_progress` is set and a download's size is known.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(show_progress: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .context("Failed to construct HTTP client")?;
        Ok(Self {
            client,
            show_progress,
        })
    }

    /// Runs the dependency closure of `goals` in topological order.
    ///
    /// # Errors
    ///
    /// Propagates graph-ordering errors (cycles) and the first task
    /// failure, wrapped with the failing task's name.
    pub async fn run(&self, graph: &TaskGraph, goals: &[TaskId]) -> Result<RunSummary> {
        let order = graph.execution_order(goals)?;
        let mut summary = RunSummary::default();
        for id in order {
            let task = graph.get(id);
            if !task.precondition.should_run() {
                debug!("Skipping {} (already satisfied)", task.name);
                summary.skipped.push(task.name.clone());
                continue;
            }
            info!("Running {}", task.name);
            self.execute(task)
                .await
                .with_context(|| format!("Task '{}' failed", task.name))?;
            summary.executed.push(task.name.clone());
        }
        Ok(summary)
    }

    async fn execute(&self, task: &Task) -> Result<()> {
        match &task.action {
            Action::EnsureDir { path } => ensure_dir(path),
            Action::Download {
                url,
                dest,
                bearer_token,
            } => self.download(url, dest, bearer_token.as_deref()).await,
            Action::Extract { archive, dest } => extract_archive(archive, dest).await,
            Action::RemoveFile { path } => {
                if remove_file_if_exists(path)? {
                    info!("Removed {}", path.display());
                }
                Ok(())
            }
            Action::GitClone {
                url,
                directory,
                branch,
                working_dir,
            } => {
                info!("Cloning {url}");
                GitCommand::clone_repository(url, directory, branch.as_deref(), working_dir)
                    .execute()
                    .await?;
                Ok(())
            }
            Action::GitPull { repository } => {
                info!("Updating {}", repository.display());
                GitCommand::pull(repository).execute().await?;
                Ok(())
            }
        }
    }

    async fn download(&self, url: &str, dest: &Path, bearer_token: Option<&str>) -> Result<()> {
        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }

        info!("Downloading {url}");
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, DOWNLOAD_USER_AGENT);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(BindrigError::NetworkError)?;
        if !response.status().is_success() {
            return Err(BindrigError::DownloadStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let bar = match response.content_length() {
            Some(length) if self.show_progress => {
                let bar = ProgressBar::new(length);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:30.cyan/blue} {bytes}/{total_bytes} {bytes_per_sec}",
                    )
                    .expect("static progress template"),
                );
                bar
            }
            _ => ProgressBar::hidden(),
        };

        // File::create truncates, so a partial file from an aborted
        // transfer is overwritten rather than appended to.
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(BindrigError::NetworkError)?;
            file.write_all(&chunk).await?;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await?;
        bar.finish_and_clear();

        info!("Downloaded {}", dest.display());
        Ok(())
    }
}

async fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    info!("Extracting {}", archive.display());
    tokio::task::spawn_blocking(move || extract_blocking(&archive, &dest))
        .await
        .context("Extraction task panicked")?
}

fn extract_blocking(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|source| BindrigError::ExtractionFailed {
        archive: archive.to_path_buf(),
        source,
    })?;
    ensure_dir(dest)?;
    zip.extract(dest).map_err(|source| BindrigError::ExtractionFailed {
        archive: archive.to_path_buf(),
        source,
    })?;
    Ok(())
}
