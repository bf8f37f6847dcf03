//! Thin wrapper around the system `git` command.
//!
//! Mirror checkouts go through the system git binary rather than an
//! embedded Git library, the same way Cargo's `git-fetch-with-cli` does:
//! the user's existing authentication setup (SSH agents, credential
//! helpers, platform keychains) keeps working without this tool knowing
//! anything about it. Arguments are passed as separate parameters, never
//! through a shell, and every invocation runs under a timeout.
//!
//! Only the two operations the mirror model needs are exposed: a clone
//! (optionally pinned to a single branch) and a force-pull of an existing
//! checkout. Non-zero exit is a hard failure carrying git's stderr; there
//! are no retries.

use crate::constants::{GIT_CLONE_TIMEOUT, GIT_PULL_TIMEOUT};
use crate::core::BindrigError;
use crate::utils::platform::{ensure_git_available, git_command};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Builder for a single git invocation.
#[derive(Debug)]
pub struct GitCommand {
    operation: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Duration,
}

impl GitCommand {
    /// Creates a builder for the named operation (used in error messages).
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Vec::new(),
            current_dir: None,
            timeout_duration: Duration::from_secs(300),
        }
    }

    /// Builds a clone of `url` into `directory`, run from `working_dir`.
    ///
    /// A branch pin becomes `--branch <pin> --single-branch`, restricting
    /// the clone to exactly the pinned ref.
    #[must_use]
    pub fn clone_repository(
        url: &str,
        directory: &str,
        branch: Option<&str>,
        working_dir: &Path,
    ) -> Self {
        let mut cmd = Self::new("clone")
            .current_dir(working_dir)
            .timeout(GIT_CLONE_TIMEOUT)
            .arg("clone");
        if let Some(branch) = branch {
            cmd = cmd.args(["--branch", branch, "--single-branch"]);
        }
        cmd.arg(url).arg(directory)
    }

    /// Builds a force-pull of the checkout at `repository`, discarding
    /// local divergence.
    #[must_use]
    pub fn pull(repository: &Path) -> Self {
        Self::new("pull")
            .current_dir(repository)
            .timeout(GIT_PULL_TIMEOUT)
            .args(["pull", "--force"])
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Runs the command, returning captured stdout on success.
    ///
    /// # Errors
    ///
    /// - [`BindrigError::GitNotFound`] when git is not installed
    /// - [`BindrigError::GitTimeout`] when the timeout elapses
    /// - [`BindrigError::GitCommandError`] on non-zero exit, with stderr
    pub async fn execute(self) -> Result<String, BindrigError> {
        ensure_git_available()?;

        let mut command = Command::new(git_command());
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        tracing::debug!("Running git {} in {:?}", self.args.join(" "), self.current_dir);

        let output = timeout(self.timeout_duration, command.output())
            .await
            .map_err(|_| BindrigError::GitTimeout {
                operation: self.operation.clone(),
                seconds: self.timeout_duration.as_secs(),
            })??;

        if !output.status.success() {
            return Err(BindrigError::GitCommandError {
                operation: self.operation,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
