//! Global constants: file names, wire details, and operation timeouts.

use std::time::Duration;

/// Manifest file name searched for in the current and parent directories.
pub const MANIFEST_NAME: &str = "bindrig.toml";

/// Default build directory, relative to the manifest location.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// API path prefix of the modeled registry shape.
pub const API_PREFIX: &str = "api/v4";

/// User-agent sent with artifact downloads.
///
/// The registry host sits behind an edge proxy that rejects non-browser
/// clients, so downloads always identify as desktop Firefox on Linux.
pub const DOWNLOAD_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0";

/// Timeout for a single artifact download (10 minutes).
///
/// Prebuilt binary archives for a full target matrix run into the
/// hundreds of megabytes on slow links.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for git clone operations (120 seconds).
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for git pull operations (60 seconds).
pub const GIT_PULL_TIMEOUT: Duration = Duration::from_secs(60);
