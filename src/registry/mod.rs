//! Entity model for a GitLab-style package registry.
//!
//! The remote registry is addressed through a four-level hierarchy:
//!
//! ```text
//! Server -> Project -> PackageRegistry -> Package -> Artifact
//! ```
//!
//! Entities live in arenas owned by [`crate::workspace::Workspace`] and
//! reference each other through integer handles ([`ServerId`],
//! [`ProjectId`], ...) rather than owning pointers, so an artifact can
//! navigate back to its project with an index lookup and no reference
//! cycles exist. Every level is memoized by a derived cache key - the
//! endpoint URL for projects and packages, `fileName[:suffix@dir]` for
//! artifacts - and equal coordinates always resolve to the same handle.
//!
//! The structs here are plain data: URL and path derivations happen when
//! the workspace constructs an entity, and no method performs I/O.

use crate::graph::TaskId;
use std::path::{Path, PathBuf};

/// Handle to a [`Server`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerId(pub(crate) usize);

/// Handle to a [`Project`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectId(pub(crate) usize);

/// Handle to a [`PackageRegistry`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(pub(crate) usize);

/// Handle to a [`Package`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageId(pub(crate) usize);

/// Handle to an [`Artifact`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(pub(crate) usize);

/// A remote registry host, identified by its address.
#[derive(Debug)]
pub struct Server {
    pub(crate) address: String,
    pub(crate) api_url: String,
    pub(crate) token: Option<String>,
}

impl Server {
    /// Host address the server was registered under.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Base API address, `https://<address>/api/v4`.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Bearer credential passed through to downloads, if configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// A namespaced resource container on a server.
///
/// Identified by its endpoint URL; path-based and numeric-id lookups that
/// derive the same endpoint string are the same project.
#[derive(Debug)]
pub struct Project {
    pub(crate) server: ServerId,
    pub(crate) endpoint: String,
    pub(crate) name: String,
    pub(crate) registry: RegistryId,
}

impl Project {
    /// Owning server handle.
    #[must_use]
    pub fn server(&self) -> ServerId {
        self.server
    }

    /// Endpoint URL, `<apiUrl>/projects/<percent-encoded path-or-id>`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Display name; also the default artifact cache directory and the
    /// capitalized stem of generated task names.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's package registry, created eagerly with the project.
    #[must_use]
    pub fn registry(&self) -> RegistryId {
        self.registry
    }
}

/// The package namespace of a project.
#[derive(Debug)]
pub struct PackageRegistry {
    pub(crate) project: ProjectId,
    pub(crate) endpoint: String,
}

impl PackageRegistry {
    /// Owning project handle.
    #[must_use]
    pub fn project(&self) -> ProjectId {
        self.project
    }

    /// Endpoint URL, `<projectEndpoint>/packages`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// A named, optionally versioned bundle within a package registry.
#[derive(Debug)]
pub struct Package {
    pub(crate) registry: RegistryId,
    pub(crate) url: String,
}

impl Package {
    /// Owning registry handle.
    #[must_use]
    pub fn registry(&self) -> RegistryId {
        self.registry
    }

    /// Endpoint URL, `<registryEndpoint>/<percent-encoded path>[/<version>]`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// One downloadable file within a package, optionally unpacked into a
/// named sub-directory.
///
/// All paths and the download URL are derived once, from the artifact's
/// own fields, when the workspace creates the entity. The three task
/// handles start empty and are filled in lazily the first time each
/// operation is requested.
#[derive(Debug)]
pub struct Artifact {
    pub(crate) package: PackageId,
    pub(crate) file_name: String,
    pub(crate) suffix: String,
    pub(crate) directory_name: String,
    pub(crate) url: String,
    pub(crate) local_dir: PathBuf,
    pub(crate) local_path: PathBuf,
    pub(crate) output_dir: PathBuf,
    pub(crate) task_stem: String,
    pub(crate) download_task: Option<TaskId>,
    pub(crate) extract_task: Option<TaskId>,
    pub(crate) clean_task: Option<TaskId>,
}

impl Artifact {
    /// Owning package handle.
    #[must_use]
    pub fn package(&self) -> PackageId {
        self.package
    }

    /// File name within the package.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Disambiguating suffix; empty for the single-purpose common case.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Cache directory name under the build root.
    #[must_use]
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    /// Fully-formed download URL, `<packageUrl>/<fileName>`.
    #[must_use]
    pub fn download_url(&self) -> &str {
        &self.url
    }

    /// Local cache directory, `<buildRoot>/<directoryName>`.
    #[must_use]
    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Local cache file path, `<localDir>/<fileName>`.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Extraction directory: `<localDir>` when the suffix is blank,
    /// `<localDir>/<suffix>` otherwise.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Derives an artifact's memoization key from its own fields.
///
/// The common case (no suffix) keys purely by file name; suffixed
/// artifacts key by `fileName:suffix@directoryName` so the same physical
/// file can be fetched into multiple distinct sub-directories without
/// colliding.
#[must_use]
pub fn artifact_key(file_name: &str, suffix: &str, directory_name: &str) -> String {
    if suffix.is_empty() {
        file_name.to_string()
    } else {
        format!("{file_name}:{suffix}@{directory_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_suffix_keys_by_file_name_alone() {
        assert_eq!(artifact_key("a.zip", "", "out"), "a.zip");
        assert_eq!(artifact_key("a.zip", "", "elsewhere"), "a.zip");
    }

    #[test]
    fn suffixed_keys_are_distinct_per_suffix_and_directory() {
        let x64 = artifact_key("a.zip", "x64", "out");
        let arm64 = artifact_key("a.zip", "arm64", "out");
        assert_eq!(x64, "a.zip:x64@out");
        assert_eq!(arm64, "a.zip:arm64@out");
        assert_ne!(x64, arm64);
        assert_ne!(x64, artifact_key("a.zip", "x64", "other"));
    }
}
