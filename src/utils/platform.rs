//! Platform helpers for locating the system git binary.
//!
//! Like Cargo with `git-fetch-with-cli`, bindrig shells out to the
//! system's git rather than embedding a Git implementation, so clones and
//! pulls pick up the user's existing authentication (SSH agents,
//! credential helpers, platform keychains) for free.

use crate::core::BindrigError;

/// Returns the git command name for the current platform.
#[must_use]
pub const fn git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Verifies that git is available on the `PATH`.
///
/// # Errors
///
/// Returns [`BindrigError::GitNotFound`] when the binary cannot be located.
pub fn ensure_git_available() -> Result<(), BindrigError> {
    which::which(git_command()).map_err(|_| BindrigError::GitNotFound)?;
    Ok(())
}
