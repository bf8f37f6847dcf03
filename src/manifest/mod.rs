//! Manifest parsing and validation (`bindrig.toml`).
//!
//! The manifest declares everything the task graph is planned from:
//! registry servers, the packages and artifacts to fetch from them, and
//! the version-controlled mirrors to keep checked out. A minimal manifest
//! for an SDL binding project looks like:
//!
//! ```toml
//! build-dir = "build"
//!
//! [servers.karma]
//! address = "git.karmakrafts.dev"
//! token-env = "CI_JOB_TOKEN"
//!
//! [packages.sdl]
//! server = "karma"
//! project = "kk/multiplatform-sdl"
//! package = "generic/build"
//! version = "3.2.14"
//! version-env = "SDL_VERSION"
//!
//! [[packages.sdl.artifacts]]
//! file = "build-linux-x64-debug.zip"
//! suffix = "linuxX64"
//!
//! [[packages.sdl.artifacts]]
//! file = "build-windows-x64-debug.zip"
//! suffix = "windowsX64"
//!
//! [mirrors.sdl-headers]
//! url = "https://github.com/libsdl-org/SDL"
//! branch = "release-3.2.14"
//! group = "sdlHeaders"
//! ```
//!
//! Maps are ordered (`BTreeMap`), so planning from the same manifest
//! always registers tasks in the same order. Parsing is strict: unknown
//! fields are rejected rather than silently ignored.

use crate::constants::{DEFAULT_BUILD_DIR, MANIFEST_NAME};
use crate::core::BindrigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root of a parsed `bindrig.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    /// Build directory, relative to the manifest location.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Registry servers by name.
    #[serde(default)]
    pub servers: BTreeMap<String, ServerSpec>,

    /// Packages to fetch, by name.
    #[serde(default)]
    pub packages: BTreeMap<String, PackageSpec>,

    /// Version-controlled mirrors to keep checked out, by name.
    #[serde(default)]
    pub mirrors: BTreeMap<String, MirrorSpec>,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUILD_DIR)
}

/// One registry server entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerSpec {
    /// Host address, e.g. `git.karmakrafts.dev`.
    pub address: String,

    /// Environment variable holding a bearer credential for this server.
    /// The variable being absent at planning time is not an error; the
    /// downloads simply go out unauthenticated.
    #[serde(default)]
    pub token_env: Option<String>,
}

/// One package entry: which project on which server, and which files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageSpec {
    /// Name of the server entry this package is fetched from.
    pub server: String,

    /// Project path (`group/project`) or numeric project id.
    pub project: String,

    /// Display-name override; defaults to the last path segment of
    /// `project` (or the id itself for numeric ids).
    #[serde(default)]
    pub project_name: Option<String>,

    /// Package path within the project's registry, e.g. `generic/build`.
    pub package: String,

    /// Package version.
    pub version: String,

    /// Environment variable that overrides `version` when set. The
    /// override is read once, at the moment the package is looked up.
    #[serde(default)]
    pub version_env: Option<String>,

    /// Artifacts to download from this package.
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

/// One downloadable artifact within a package entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ArtifactSpec {
    /// File name within the package.
    pub file: String,

    /// Disambiguating suffix; also the extraction sub-directory when
    /// non-empty. Typically a target triple-ish label like `linuxX64`.
    #[serde(default)]
    pub suffix: String,

    /// Cache directory override; defaults to the project display name.
    #[serde(default)]
    pub dir: Option<String>,
}

/// One mirror entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MirrorSpec {
    /// Remote address of the source tree.
    pub url: String,

    /// Optional branch or tag pin.
    #[serde(default)]
    pub branch: Option<String>,

    /// Task grouping label; defaults to the mirror name.
    #[serde(default)]
    pub group: Option<String>,
}

impl Manifest {
    /// Parses a manifest from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::TomlError`] on syntax or schema errors.
    pub fn parse(content: &str) -> Result<Self, BindrigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::IoError`] when the file cannot be read and
    /// [`BindrigError::ManifestParseError`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, BindrigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BindrigError::ManifestParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Searches for a `bindrig.toml` in `start` and its parents.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::ManifestNotFound`] when no ancestor holds a
    /// manifest.
    pub fn find_from(start: &Path) -> Result<PathBuf, BindrigError> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            dir = current.parent();
        }
        Err(BindrigError::ManifestNotFound)
    }

    /// Validates cross-references and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::ServerNotFound`] for dangling server
    /// references and [`BindrigError::ManifestValidationError`] for
    /// anything else.
    pub fn validate(&self) -> Result<(), BindrigError> {
        for (name, package) in &self.packages {
            if !self.servers.contains_key(&package.server) {
                return Err(BindrigError::ServerNotFound {
                    package: name.clone(),
                    server: package.server.clone(),
                });
            }
            if package.project.is_empty() {
                return Err(validation(format!("package '{name}' has an empty project")));
            }
            if package.package.is_empty() {
                return Err(validation(format!("package '{name}' has an empty package path")));
            }
            if package.version.is_empty() && package.version_env.is_none() {
                return Err(validation(format!("package '{name}' has no version")));
            }
            if package.artifacts.is_empty() {
                return Err(validation(format!("package '{name}' declares no artifacts")));
            }
            for artifact in &package.artifacts {
                if artifact.file.is_empty() {
                    return Err(validation(format!("package '{name}' has an artifact with an empty file name")));
                }
            }
        }
        for (name, mirror) in &self.mirrors {
            if mirror.url.is_empty() {
                return Err(validation(format!("mirror '{name}' has an empty url")));
            }
        }
        Ok(())
    }
}

fn validation(reason: String) -> BindrigError {
    BindrigError::ManifestValidationError { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"
        build-dir = "out"

        [servers.karma]
        address = "git.karmakrafts.dev"
        token-env = "CI_JOB_TOKEN"

        [packages.sdl]
        server = "karma"
        project = "kk/multiplatform-sdl"
        package = "generic/build"
        version = "3.2.14"

        [[packages.sdl.artifacts]]
        file = "build-linux-x64-debug.zip"
        suffix = "linuxX64"

        [mirrors.sdl-headers]
        url = "https://github.com/libsdl-org/SDL"
        branch = "release-3.2.14"
        group = "sdlHeaders"
    "#;

    #[test]
    fn full_manifest_parses() {
        let manifest = Manifest::parse(FULL).unwrap();
        assert_eq!(manifest.build_dir, PathBuf::from("out"));
        assert_eq!(manifest.servers["karma"].address, "git.karmakrafts.dev");
        let sdl = &manifest.packages["sdl"];
        assert_eq!(sdl.project, "kk/multiplatform-sdl");
        assert_eq!(sdl.artifacts.len(), 1);
        assert_eq!(sdl.artifacts[0].suffix, "linuxX64");
        assert_eq!(manifest.mirrors["sdl-headers"].branch.as_deref(), Some("release-3.2.14"));
        manifest.validate().unwrap();
    }

    #[test]
    fn build_dir_and_suffix_have_defaults() {
        let manifest = Manifest::parse(
            r#"
            [servers.s]
            address = "example.com"

            [packages.p]
            server = "s"
            project = "grp/proj"
            package = "generic/build"
            version = "1.0.0"

            [[packages.p.artifacts]]
            file = "a.zip"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.build_dir, PathBuf::from("build"));
        assert_eq!(manifest.packages["p"].artifacts[0].suffix, "");
        manifest.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Manifest::parse("unknown-key = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn dangling_server_reference_fails_validation() {
        let manifest = Manifest::parse(
            r#"
            [packages.p]
            server = "missing"
            project = "grp/proj"
            package = "generic/build"
            version = "1.0.0"

            [[packages.p.artifacts]]
            file = "a.zip"
            "#,
        )
        .unwrap();
        let err = manifest.validate().unwrap_err();
        assert!(matches!(
            err,
            BindrigError::ServerNotFound { package, server } if package == "p" && server == "missing"
        ));
    }

    #[test]
    fn empty_artifact_list_fails_validation() {
        let manifest = Manifest::parse(
            r#"
            [servers.s]
            address = "example.com"

            [packages.p]
            server = "s"
            project = "grp/proj"
            package = "generic/build"
            version = "1.0.0"
            "#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn find_from_walks_up_to_the_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&manifest_path, "").unwrap();
        let nested = tmp.path().join("sub").join("dir");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Manifest::find_from(&nested).unwrap();
        assert_eq!(found, manifest_path);
    }

    #[test]
    fn find_from_reports_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let err = Manifest::find_from(tmp.path()).unwrap_err();
        assert!(matches!(err, BindrigError::ManifestNotFound));
    }
}
