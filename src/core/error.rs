//! Error handling for bindrig.
//!
//! All failure modes funnel into [`BindrigError`], split along the same
//! lines the tool itself is split:
//!
//! - **Graph construction** - duplicate task names, unknown task
//!   references, dependency cycles. These surface while the task graph is
//!   being assembled; no partial graph is usable afterwards.
//! - **Manifest** - missing or malformed `bindrig.toml`, validation
//!   failures with field-precise messages.
//! - **Execution** - network, filesystem, archive, and git failures
//!   raised from task bodies. None of these are retried; the runner halts
//!   and reports the failed task.
//!
//! Deliberate precondition skips are *not* errors and never appear here;
//! they are successful no-ops reported by the runner as skipped tasks.
//!
//! Call sites use `anyhow::Result` with `.context(...)` layered on top, so
//! a failure reaching `main` carries both the typed root cause and the
//! operation it interrupted.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bindrig operations.
#[derive(Error, Debug)]
pub enum BindrigError {
    /// Git executable not found on the system PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// A git command returned a non-zero exit status.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g., "clone", "pull").
        operation: String,
        /// The error output from the git command.
        stderr: String,
    },

    /// A git command exceeded its timeout.
    #[error("Git operation timed out after {seconds}s: {operation}")]
    GitTimeout {
        /// The git operation that timed out.
        operation: String,
        /// The configured timeout in seconds.
        seconds: u64,
    },

    /// A download returned a non-success HTTP status.
    #[error("Download of {url} failed with status {status}")]
    DownloadStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code returned by the server.
        status: u16,
    },

    /// A task with the same generated name was already registered.
    ///
    /// Task names are derived from coordinates, so this means two distinct
    /// coordinate tuples mangled to the same name. The graph is not usable.
    #[error("A task named '{name}' is already registered")]
    DuplicateTask {
        /// The colliding task name.
        name: String,
    },

    /// A requested goal does not name any registered task.
    #[error("No task named '{name}' is registered")]
    TaskNotFound {
        /// The unknown task name.
        name: String,
    },

    /// The dependency edges of the graph form a cycle.
    #[error("Dependency cycle detected involving task '{name}'")]
    CircularDependency {
        /// A task on the detected cycle.
        name: String,
    },

    /// No manifest file was found in the current or any parent directory.
    #[error("No bindrig.toml found in current directory or any parent")]
    ManifestNotFound,

    /// The manifest file could not be parsed.
    #[error("Failed to parse manifest {path}: {reason}")]
    ManifestParseError {
        /// Path of the offending manifest.
        path: PathBuf,
        /// Parser diagnostics.
        reason: String,
    },

    /// The manifest parsed but its contents are invalid.
    #[error("Invalid manifest: {reason}")]
    ManifestValidationError {
        /// What is wrong with the manifest.
        reason: String,
    },

    /// A package entry references a server name that is not defined.
    #[error("Package '{package}' references undefined server '{server}'")]
    ServerNotFound {
        /// The package entry holding the dangling reference.
        package: String,
        /// The undefined server name.
        server: String,
    },

    /// Archive extraction failed.
    #[error("Failed to extract archive {archive}")]
    ExtractionFailed {
        /// The archive that could not be unpacked.
        archive: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Network-level failure from the HTTP client.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Standard I/O failure.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML syntax error while reading the manifest.
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_context() {
        let err = BindrigError::GitCommandError {
            operation: "clone".to_string(),
            stderr: "fatal: repository not found".to_string(),
        };
        assert_eq!(err.to_string(), "Git operation failed: clone");

        let err = BindrigError::DownloadStatus {
            url: "https://example.com/a.zip".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("404"));

        let err = BindrigError::DuplicateTask {
            name: "downloadSdlLinuxX64".to_string(),
        };
        assert!(err.to_string().contains("downloadSdlLinuxX64"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BindrigError = io.into();
        assert!(matches!(err, BindrigError::IoError(_)));
    }
}
