//! The top-level factory that assembles the task graph.
//!
//! A [`Workspace`] owns everything the configuration phase produces: the
//! entity arenas ([`Server`], [`Project`], [`PackageRegistry`],
//! [`Package`], [`Artifact`], [`Mirror`]), the cache tables that memoize
//! them, and the [`TaskSet`] the derived operations are registered into.
//! Lookups are pure bookkeeping - no lookup ever touches the network or
//! the filesystem; all I/O lives in the task actions and runs only when an
//! executor decides a task is due.
//!
//! # Identity
//!
//! Every lookup is memoized by a key derived from the coordinates alone:
//! server address, project/package endpoint URL, artifact
//! `fileName[:suffix@dir]`. Asking twice with equal coordinates returns
//! the identical handle, so one shared download feeds any number of
//! per-target extracts and re-planning the same manifest cannot duplicate
//! work. Handles are indices into the workspace arenas; parent references
//! are handles too, which gives cycle-free back-navigation (artifact →
//! package → registry → project → server).
//!
//! # Phases
//!
//! The workspace is the *construction-phase* type: all of its lookup and
//! task-factory methods take `&mut self`. Calling [`Workspace::into_graph`]
//! ends that phase and yields the read-only [`TaskGraph`] an executor
//! consumes; nothing can be registered afterwards.
//!
//! # Derived operations
//!
//! Per artifact, three lazily-created operations, each registered once and
//! cached on the artifact entry:
//!
//! | task | precondition | effect |
//! |---|---|---|
//! | `download<Project><Suffix>` | cache file missing | streamed fetch into the cache path |
//! | `extract<Project><Suffix>` | output dir missing | unzip the cached archive (depends on + runs after download) |
//! | `clean<Project><Suffix>` | always | delete the cached file (never the extracted tree) |
//!
//! Per mirror, a clone/pull pair with the same shape: clone skips when the
//! checkout exists, pull depends on clone but deliberately skips when the
//! checkout is absent - pull updates, it never creates.

use crate::constants::API_PREFIX;
use crate::core::{BindrigError, Provider};
use crate::graph::{Action, Precondition, Task, TaskGraph, TaskId, TaskSet};
use crate::manifest::Manifest;
use crate::mirror::{Mirror, MirrorId};
use crate::registry::{
    artifact_key, Artifact, ArtifactId, Package, PackageId, PackageRegistry, Project, ProjectId,
    RegistryId, Server, ServerId,
};
use crate::utils::encode::{capitalized, percent_encode};
use std::collections::HashMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

/// Name of the lazily-registered build-directory bootstrap task.
const ENSURE_BUILD_DIR_TASK: &str = "ensureBuildDirectory";

/// Construction-phase owner of all entities, caches, and tasks.
#[derive(Debug)]
pub struct Workspace {
    build_root: PathBuf,
    tasks: TaskSet,

    servers: Vec<Server>,
    server_index: HashMap<String, ServerId>,

    projects: Vec<Project>,
    project_index: HashMap<String, ProjectId>,

    registries: Vec<PackageRegistry>,

    packages: Vec<Package>,
    package_index: HashMap<String, PackageId>,

    artifacts: Vec<Artifact>,
    artifact_index: HashMap<(PackageId, String), ArtifactId>,

    mirrors: Vec<Mirror>,
}

impl Workspace {
    /// Creates an empty workspace rooted at `build_root`.
    #[must_use]
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
            tasks: TaskSet::new(),
            servers: Vec::new(),
            server_index: HashMap::new(),
            projects: Vec::new(),
            project_index: HashMap::new(),
            registries: Vec::new(),
            packages: Vec::new(),
            package_index: HashMap::new(),
            artifacts: Vec::new(),
            artifact_index: HashMap::new(),
            mirrors: Vec::new(),
        }
    }

    /// The build root all cache paths and checkouts live under.
    #[must_use]
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Read access to the registered tasks.
    #[must_use]
    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Ends the construction phase, yielding the frozen graph.
    #[must_use]
    pub fn into_graph(self) -> TaskGraph {
        self.tasks.freeze()
    }

    // ---- registry lookups -------------------------------------------------

    /// Returns the server registered under `address`, creating it on first
    /// use. Identity is the address; repeated calls return the same handle.
    pub fn server(&mut self, address: &str) -> ServerId {
        if let Some(&id) = self.server_index.get(address) {
            return id;
        }
        let id = ServerId(self.servers.len());
        self.servers.push(Server {
            address: address.to_string(),
            api_url: format!("https://{address}/{API_PREFIX}"),
            token: None,
        });
        self.server_index.insert(address.to_string(), id);
        id
    }

    /// Attaches a bearer credential to a server. Downloads from the server
    /// carry it as an `Authorization: Bearer` header.
    pub fn authenticate(&mut self, server: ServerId, token: impl Into<String>) {
        self.servers[server.0].token = Some(token.into());
    }

    /// Returns the project at `path` on `server`, creating it on first use.
    ///
    /// The endpoint is `<apiUrl>/projects/<percent-encoded path>` and is
    /// also the cache key, so a numeric-id lookup that derives the same
    /// endpoint string returns the same project. `name` overrides the
    /// display name; it defaults to the last path segment. The name of the
    /// first registration wins for subsequent lookups of the same endpoint.
    pub fn project(&mut self, server: ServerId, path: &str, name: Option<&str>) -> ProjectId {
        let default_name = path.rsplit('/').next().unwrap_or(path);
        let endpoint = format!(
            "{}/projects/{}",
            self.servers[server.0].api_url,
            percent_encode(path)
        );
        self.project_at(server, endpoint, name.unwrap_or(default_name))
    }

    /// Returns the project with numeric id `id` on `server`, creating it on
    /// first use. The display name defaults to the decimal id.
    pub fn project_by_id(&mut self, server: ServerId, id: u64, name: Option<&str>) -> ProjectId {
        let endpoint = format!("{}/projects/{id}", self.servers[server.0].api_url);
        let default_name = id.to_string();
        self.project_at(server, endpoint, name.unwrap_or(&default_name))
    }

    fn project_at(&mut self, server: ServerId, endpoint: String, name: &str) -> ProjectId {
        if let Some(&id) = self.project_index.get(&endpoint) {
            return id;
        }
        let id = ProjectId(self.projects.len());
        let registry = RegistryId(self.registries.len());
        // The package registry is the project's only child and exists from
        // the moment the project does.
        self.registries.push(PackageRegistry {
            project: id,
            endpoint: format!("{endpoint}/packages"),
        });
        self.projects.push(Project {
            server,
            endpoint: endpoint.clone(),
            name: name.to_string(),
            registry,
        });
        self.project_index.insert(endpoint, id);
        id
    }

    /// Returns the unversioned package at `path` in the project's registry,
    /// creating it on first use.
    pub fn package(&mut self, project: ProjectId, path: &str) -> PackageId {
        let url = format!(
            "{}/{}",
            self.registry_endpoint(project),
            percent_encode(path)
        );
        self.package_at(project, url)
    }

    /// Returns the package at `path` pinned to a version, creating it on
    /// first use.
    ///
    /// The version comes from a [`Provider`], which is resolved exactly
    /// once - here, at the moment of the lookup - so environment-dependent
    /// versions are read when the package is actually requested rather
    /// than when the provider was built.
    pub fn package_versioned(
        &mut self,
        project: ProjectId,
        path: &str,
        version: &Provider<String>,
    ) -> PackageId {
        let url = format!(
            "{}/{}/{}",
            self.registry_endpoint(project),
            percent_encode(path),
            version.get()
        );
        self.package_at(project, url)
    }

    fn registry_endpoint(&self, project: ProjectId) -> String {
        self.registries[self.projects[project.0].registry.0]
            .endpoint
            .clone()
    }

    fn package_at(&mut self, project: ProjectId, url: String) -> PackageId {
        if let Some(&id) = self.package_index.get(&url) {
            return id;
        }
        let id = PackageId(self.packages.len());
        self.packages.push(Package {
            registry: self.projects[project.0].registry,
            url: url.clone(),
        });
        self.package_index.insert(url, id);
        id
    }

    /// Returns the artifact `file_name` within `package`, creating it on
    /// first use.
    ///
    /// `suffix` disambiguates multiple fetches of the same file name (one
    /// per target platform, typically) and doubles as the extraction
    /// sub-directory. `directory_name` names the cache directory under the
    /// build root and defaults to the owning project's display name. The
    /// memoization key is the file name alone when the suffix is empty,
    /// `fileName:suffix@directoryName` otherwise.
    pub fn artifact(
        &mut self,
        package: PackageId,
        file_name: &str,
        suffix: &str,
        directory_name: Option<&str>,
    ) -> ArtifactId {
        let project_name = self.package_project(package).name.clone();
        let directory_name = directory_name.unwrap_or(&project_name);
        let key = (package, artifact_key(file_name, suffix, directory_name));
        if let Some(&id) = self.artifact_index.get(&key) {
            return id;
        }

        let local_dir = self.build_root.join(directory_name);
        let local_path = local_dir.join(file_name);
        let output_dir = if suffix.is_empty() {
            local_dir.clone()
        } else {
            local_dir.join(suffix)
        };
        let id = ArtifactId(self.artifacts.len());
        self.artifacts.push(Artifact {
            package,
            file_name: file_name.to_string(),
            suffix: suffix.to_string(),
            directory_name: directory_name.to_string(),
            url: format!("{}/{file_name}", self.packages[package.0].url),
            local_dir,
            local_path,
            output_dir,
            task_stem: format!("{}{}", capitalized(&project_name), capitalized(suffix)),
            download_task: None,
            extract_task: None,
            clean_task: None,
        });
        self.artifact_index.insert(key, id);
        id
    }

    // ---- artifact task factory --------------------------------------------

    /// Returns the artifact's download task, registering it on first
    /// request.
    ///
    /// The task fetches `<packageUrl>/<fileName>` into the local cache
    /// path and is skipped while the cache file exists.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] when another entity already
    /// claimed the derived task name.
    pub fn download_task(&mut self, artifact: ArtifactId) -> Result<TaskId, BindrigError> {
        if let Some(id) = self.artifacts[artifact.0].download_task {
            return Ok(id);
        }
        let art = &self.artifacts[artifact.0];
        let project = self.artifact_project(artifact);
        let token = self.servers[project.server.0].token.clone();
        let task = Task {
            name: format!("download{}", art.task_stem),
            group: Some(project.name.clone()),
            action: Action::Download {
                url: art.url.clone(),
                dest: art.local_path.clone(),
                bearer_token: token,
            },
            depends_on: Vec::new(),
            must_run_after: Vec::new(),
            precondition: Precondition::PathMissing(art.local_path.clone()),
        };
        let id = self.tasks.register(task)?;
        self.artifacts[artifact.0].download_task = Some(id);
        Ok(id)
    }

    /// Returns the artifact's extract task, registering it (and,
    /// transitively, the download task it depends on) on first request.
    ///
    /// The task unpacks the cached archive into the artifact's output
    /// directory and is skipped while that directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] on a derived-name collision.
    pub fn extract_task(&mut self, artifact: ArtifactId) -> Result<TaskId, BindrigError> {
        if let Some(id) = self.artifacts[artifact.0].extract_task {
            return Ok(id);
        }
        let download = self.download_task(artifact)?;
        let art = &self.artifacts[artifact.0];
        let project = self.artifact_project(artifact);
        let task = Task {
            name: format!("extract{}", art.task_stem),
            group: Some(project.name.clone()),
            action: Action::Extract {
                archive: art.local_path.clone(),
                dest: art.output_dir.clone(),
            },
            depends_on: vec![download],
            must_run_after: vec![download],
            precondition: Precondition::PathMissing(art.output_dir.clone()),
        };
        let id = self.tasks.register(task)?;
        self.artifacts[artifact.0].extract_task = Some(id);
        Ok(id)
    }

    /// Returns the artifact's clean task, registering it on first request.
    ///
    /// The task unconditionally deletes the cached archive. Extracted
    /// output is untouched - it is derived state, regenerated by running
    /// extract again.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] on a derived-name collision.
    pub fn clean_task(&mut self, artifact: ArtifactId) -> Result<TaskId, BindrigError> {
        if let Some(id) = self.artifacts[artifact.0].clean_task {
            return Ok(id);
        }
        let art = &self.artifacts[artifact.0];
        let task = Task {
            name: format!("clean{}", art.task_stem),
            group: None,
            action: Action::RemoveFile {
                path: art.local_path.clone(),
            },
            depends_on: Vec::new(),
            must_run_after: Vec::new(),
            precondition: Precondition::Always,
        };
        let id = self.tasks.register(task)?;
        self.artifacts[artifact.0].clean_task = Some(id);
        Ok(id)
    }

    // ---- mirrors ----------------------------------------------------------

    /// Declares a mirror of a version-controlled source tree.
    ///
    /// Mirrors are not memoized: each declaration owns its clone/pull task
    /// pair, and two declarations with the same name collide on their
    /// derived task names when those tasks are requested.
    pub fn mirror(
        &mut self,
        name: &str,
        url: &str,
        branch: Option<&str>,
        group: Option<&str>,
    ) -> MirrorId {
        let id = MirrorId(self.mirrors.len());
        self.mirrors
            .push(Mirror::new(name, url, branch, group, &self.build_root));
        id
    }

    /// Returns the mirror's clone task, registering it on first request.
    ///
    /// Clone runs in the build root (depending on the bootstrap task that
    /// creates it), restricts to a single branch when a pin is set, and is
    /// skipped while the checkout exists.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] on a derived-name collision.
    pub fn clone_task(&mut self, mirror: MirrorId) -> Result<TaskId, BindrigError> {
        if let Some(id) = self.mirrors[mirror.0].clone_task {
            return Ok(id);
        }
        let ensure = self.ensure_build_dir_task();
        let m = &self.mirrors[mirror.0];
        let task = Task {
            name: format!("clone{}", m.task_stem),
            group: Some(m.group.clone()),
            action: Action::GitClone {
                url: m.url.clone(),
                directory: m.name.clone(),
                branch: m.branch.clone(),
                working_dir: self.build_root.clone(),
            },
            depends_on: vec![ensure],
            must_run_after: Vec::new(),
            precondition: Precondition::PathMissing(m.local_path.clone()),
        };
        let id = self.tasks.register(task)?;
        self.mirrors[mirror.0].clone_task = Some(id);
        Ok(id)
    }

    /// Returns the mirror's pull task, registering it (and, transitively,
    /// the clone task it depends on) on first request.
    ///
    /// Pull force-updates the existing checkout and is skipped while the
    /// checkout is absent - the dependency on clone exists for ordering,
    /// not for satisfying pull's own precondition, so pull never creates a
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] on a derived-name collision.
    pub fn pull_task(&mut self, mirror: MirrorId) -> Result<TaskId, BindrigError> {
        if let Some(id) = self.mirrors[mirror.0].pull_task {
            return Ok(id);
        }
        let clone = self.clone_task(mirror)?;
        let m = &self.mirrors[mirror.0];
        let task = Task {
            name: format!("pull{}", m.task_stem),
            group: Some(m.group.clone()),
            action: Action::GitPull {
                repository: m.local_path.clone(),
            },
            depends_on: vec![clone],
            must_run_after: Vec::new(),
            precondition: Precondition::PathExists(m.local_path.clone()),
        };
        let id = self.tasks.register(task)?;
        self.mirrors[mirror.0].pull_task = Some(id);
        Ok(id)
    }

    /// Returns the build-directory bootstrap task, registering it the
    /// first time any caller asks.
    pub fn ensure_build_dir_task(&mut self) -> TaskId {
        let path = self.build_root.clone();
        self.tasks.get_or_register(ENSURE_BUILD_DIR_TASK, || Task {
            name: ENSURE_BUILD_DIR_TASK.to_string(),
            group: None,
            action: Action::EnsureDir { path: path.clone() },
            depends_on: Vec::new(),
            must_run_after: Vec::new(),
            precondition: Precondition::PathMissing(path),
        })
    }

    // ---- planning ---------------------------------------------------------

    /// Plans a full workspace from a validated manifest.
    ///
    /// `root` is the directory the manifest was loaded from; the build
    /// root is resolved against it. Every declared artifact gets its
    /// download/extract/clean triple and every mirror its clone/pull pair,
    /// so the resulting graph contains every operation the manifest
    /// implies.
    ///
    /// # Errors
    ///
    /// Validation failures and derived-task-name collisions surface here,
    /// before any graph is handed out.
    pub fn from_manifest(manifest: &Manifest, root: &Path) -> Result<Self, BindrigError> {
        manifest.validate()?;
        let mut ws = Self::new(root.join(&manifest.build_dir));

        let mut server_ids = HashMap::new();
        for (name, spec) in &manifest.servers {
            let id = ws.server(&spec.address);
            if let Some(env) = &spec.token_env {
                if let Ok(token) = std::env::var(env) {
                    ws.authenticate(id, token);
                }
            }
            server_ids.insert(name.as_str(), id);
        }

        for (name, spec) in &manifest.packages {
            let server =
                *server_ids
                    .get(spec.server.as_str())
                    .ok_or_else(|| BindrigError::ServerNotFound {
                        package: name.clone(),
                        server: spec.server.clone(),
                    })?;
            let project = if !spec.project.is_empty()
                && spec.project.chars().all(|c| c.is_ascii_digit())
            {
                let numeric = spec.project.parse::<u64>().map_err(|_| {
                    BindrigError::ManifestValidationError {
                        reason: format!("package '{name}' has an out-of-range project id"),
                    }
                })?;
                ws.project_by_id(server, numeric, spec.project_name.as_deref())
            } else {
                ws.project(server, &spec.project, spec.project_name.as_deref())
            };

            let version = match &spec.version_env {
                Some(env) => {
                    let env = env.clone();
                    let fallback = spec.version.clone();
                    Provider::deferred(move || std::env::var(&env).unwrap_or(fallback))
                }
                None => Provider::fixed(spec.version.clone()),
            };
            let package = ws.package_versioned(project, &spec.package, &version);

            for artifact_spec in &spec.artifacts {
                let artifact = ws.artifact(
                    package,
                    &artifact_spec.file,
                    &artifact_spec.suffix,
                    artifact_spec.dir.as_deref(),
                );
                ws.extract_task(artifact)?;
                ws.clean_task(artifact)?;
            }
        }

        for (name, spec) in &manifest.mirrors {
            let mirror = ws.mirror(name, &spec.url, spec.branch.as_deref(), spec.group.as_deref());
            ws.pull_task(mirror)?;
        }

        Ok(ws)
    }

    // ---- back-navigation --------------------------------------------------

    fn package_project(&self, package: PackageId) -> &Project {
        let registry = &self.registries[self.packages[package.0].registry.0];
        &self.projects[registry.project.0]
    }

    fn artifact_project(&self, artifact: ArtifactId) -> &Project {
        self.package_project(self.artifacts[artifact.0].package)
    }
}

impl Index<ServerId> for Workspace {
    type Output = Server;
    fn index(&self, id: ServerId) -> &Server {
        &self.servers[id.0]
    }
}

impl Index<ProjectId> for Workspace {
    type Output = Project;
    fn index(&self, id: ProjectId) -> &Project {
        &self.projects[id.0]
    }
}

impl Index<RegistryId> for Workspace {
    type Output = PackageRegistry;
    fn index(&self, id: RegistryId) -> &PackageRegistry {
        &self.registries[id.0]
    }
}

impl Index<PackageId> for Workspace {
    type Output = Package;
    fn index(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }
}

impl Index<ArtifactId> for Workspace {
    type Output = Artifact;
    fn index(&self, id: ArtifactId) -> &Artifact {
        &self.artifacts[id.0]
    }
}

impl Index<MirrorId> for Workspace {
    type Output = Mirror;
    fn index(&self, id: MirrorId) -> &Mirror {
        &self.mirrors[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdl_fixture(ws: &mut Workspace) -> PackageId {
        let server = ws.server("example.com");
        let project = ws.project(server, "grp/proj", None);
        let version = Provider::fixed("1.2.3".to_string());
        ws.package_versioned(project, "generic/build", &version)
    }

    #[test]
    fn servers_are_memoized_by_address() {
        let mut ws = Workspace::new("build");
        let a = ws.server("example.com");
        let b = ws.server("example.com");
        let c = ws.server("other.example.com");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(ws[a].api_url(), "https://example.com/api/v4");
    }

    #[test]
    fn projects_are_memoized_by_endpoint() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        let a = ws.project(server, "grp/proj", None);
        let b = ws.project(server, "grp/proj", None);
        let c = ws.project(server, "grp/other", None);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(ws[a].endpoint(), "https://example.com/api/v4/projects/grp%2Fproj");
        assert_eq!(ws[a].name(), "proj");
    }

    #[test]
    fn numeric_and_path_lookups_collide_on_equal_endpoints() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        let by_id = ws.project_by_id(server, 338, None);
        let by_path = ws.project(server, "338", None);
        assert_eq!(by_id, by_path);
        assert_eq!(ws[by_id].name(), "338");
    }

    #[test]
    fn each_project_owns_one_registry() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        let project = ws.project(server, "grp/proj", None);
        let registry = ws[project].registry();
        assert_eq!(ws[registry].endpoint(), "https://example.com/api/v4/projects/grp%2Fproj/packages");
        assert_eq!(ws[registry].project(), project);
    }

    #[test]
    fn packages_are_memoized_by_url() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        let project = ws.project(server, "grp/proj", None);
        let version = Provider::fixed("1.2.3".to_string());
        let a = ws.package_versioned(project, "generic/build", &version);
        let b = sdl_fixture(&mut ws);
        let unversioned = ws.package(project, "generic/build");
        let other_version = Provider::fixed("2.0.0".to_string());
        let c = ws.package_versioned(project, "generic/build", &other_version);
        assert_eq!(a, b);
        assert_ne!(a, unversioned);
        assert_ne!(a, c);
    }

    #[test]
    fn deferred_versions_resolve_at_lookup_time() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        let project = ws.project(server, "grp/proj", None);
        let version = Provider::deferred(|| "9.9.9".to_string());
        let package = ws.package_versioned(project, "generic/build", &version);
        assert!(ws[package].url().ends_with("generic%2Fbuild/9.9.9"));
    }

    #[test]
    fn artifacts_are_memoized_by_composite_key() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);

        let plain = ws.artifact(package, "a.zip", "", None);
        // Blank suffix keys by file name alone, so a directory override on
        // a later call still resolves to the first entity.
        let plain_other_dir = ws.artifact(package, "a.zip", "", Some("elsewhere"));
        assert_eq!(plain, plain_other_dir);

        let x64 = ws.artifact(package, "a.zip", "x64", Some("out"));
        let x64_again = ws.artifact(package, "a.zip", "x64", Some("out"));
        let arm64 = ws.artifact(package, "a.zip", "arm64", Some("out"));
        assert_eq!(x64, x64_again);
        assert_ne!(x64, arm64);
        assert_ne!(plain, x64);
    }

    #[test]
    fn artifact_coordinates_derive_urls_and_paths() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let artifact = ws.artifact(package, "out-linux-x64.zip", "linuxX64", None);

        let art = &ws[artifact];
        assert_eq!(
            art.download_url(),
            "https://example.com/api/v4/projects/grp%2Fproj/packages/generic%2Fbuild/1.2.3/out-linux-x64.zip"
        );
        assert_eq!(art.local_path(), Path::new("build/proj/out-linux-x64.zip"));
        assert_eq!(art.output_dir(), Path::new("build/proj/linuxX64"));
    }

    #[test]
    fn blank_suffix_extracts_into_the_cache_directory() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let artifact = ws.artifact(package, "headers.zip", "", None);
        assert_eq!(ws[artifact].output_dir(), Path::new("build/proj"));
    }

    #[test]
    fn artifact_tasks_are_created_lazily_and_once() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let artifact = ws.artifact(package, "a.zip", "linuxX64", None);
        assert!(ws.tasks().is_empty());

        let download = ws.download_task(artifact).unwrap();
        assert_eq!(ws.download_task(artifact).unwrap(), download);
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.tasks().get(download).name, "downloadProjLinuxX64");
        assert_eq!(ws.tasks().get(download).group.as_deref(), Some("proj"));
    }

    #[test]
    fn extract_depends_on_its_own_download() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let x64 = ws.artifact(package, "a.zip", "x64", None);
        let arm64 = ws.artifact(package, "b.zip", "arm64", None);

        let extract_x64 = ws.extract_task(x64).unwrap();
        let extract_arm64 = ws.extract_task(arm64).unwrap();
        let download_x64 = ws.download_task(x64).unwrap();
        let download_arm64 = ws.download_task(arm64).unwrap();

        let task = ws.tasks().get(extract_x64);
        assert_eq!(task.depends_on, vec![download_x64]);
        assert_eq!(task.must_run_after, vec![download_x64]);
        assert!(!task.depends_on.contains(&download_arm64));

        let task = ws.tasks().get(extract_arm64);
        assert_eq!(task.depends_on, vec![download_arm64]);
    }

    #[test]
    fn download_preconditions_guard_the_cache_path() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let artifact = ws.artifact(package, "a.zip", "x64", None);
        let local_path = ws[artifact].local_path().to_path_buf();

        let download = ws.download_task(artifact).unwrap();
        assert_eq!(
            ws.tasks().get(download).precondition,
            Precondition::PathMissing(local_path)
        );
    }

    #[test]
    fn clean_removes_only_the_cached_file() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        let artifact = ws.artifact(package, "a.zip", "x64", None);
        let clean = ws.clean_task(artifact).unwrap();

        let task = ws.tasks().get(clean);
        assert_eq!(task.precondition, Precondition::Always);
        assert_eq!(task.group, None);
        assert_eq!(
            task.action,
            Action::RemoveFile {
                path: ws[artifact].local_path().to_path_buf()
            }
        );
    }

    #[test]
    fn colliding_task_names_fail_construction() {
        let mut ws = Workspace::new("build");
        let package = sdl_fixture(&mut ws);
        // Same project and suffix, different files: distinct artifacts that
        // mangle to the same task name.
        let first = ws.artifact(package, "a.zip", "x64", None);
        let second = ws.artifact(package, "b.zip", "x64", None);
        assert_ne!(first, second);

        ws.download_task(first).unwrap();
        let err = ws.download_task(second).unwrap_err();
        assert!(matches!(err, BindrigError::DuplicateTask { name } if name == "downloadProjX64"));
    }

    #[test]
    fn downloads_carry_the_server_credential() {
        let mut ws = Workspace::new("build");
        let server = ws.server("example.com");
        ws.authenticate(server, "secret-token");
        let project = ws.project(server, "grp/proj", None);
        let version = Provider::fixed("1.2.3".to_string());
        let package = ws.package_versioned(project, "generic/build", &version);
        let artifact = ws.artifact(package, "a.zip", "x64", None);

        let download = ws.download_task(artifact).unwrap();
        match &ws.tasks().get(download).action {
            Action::Download { bearer_token, .. } => {
                assert_eq!(bearer_token.as_deref(), Some("secret-token"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn mirror_tasks_form_a_clone_pull_pair() {
        let mut ws = Workspace::new("build");
        let mirror = ws.mirror(
            "sdl-headers",
            "https://github.com/libsdl-org/SDL",
            Some("release-3.2.14"),
            Some("sdlHeaders"),
        );
        let pull = ws.pull_task(mirror).unwrap();
        let clone = ws.clone_task(mirror).unwrap();

        let pull_task = ws.tasks().get(pull);
        assert_eq!(pull_task.name, "pullSdlheaders");
        assert_eq!(pull_task.depends_on, vec![clone]);
        assert_eq!(
            pull_task.precondition,
            Precondition::PathExists(PathBuf::from("build/sdl-headers"))
        );

        let clone_task = ws.tasks().get(clone);
        assert_eq!(clone_task.name, "cloneSdlheaders");
        assert_eq!(clone_task.group.as_deref(), Some("sdlHeaders"));
        assert_eq!(
            clone_task.precondition,
            Precondition::PathMissing(PathBuf::from("build/sdl-headers"))
        );
        match &clone_task.action {
            Action::GitClone { branch, directory, .. } => {
                assert_eq!(branch.as_deref(), Some("release-3.2.14"));
                assert_eq!(directory, "sdl-headers");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        // Clone runs in the build root, which the bootstrap task creates.
        let ensure = ws.tasks().lookup("ensureBuildDirectory").unwrap();
        assert_eq!(clone_task.depends_on, vec![ensure]);
    }

    #[test]
    fn ensure_build_dir_is_registered_once() {
        let mut ws = Workspace::new("build");
        let a = ws.ensure_build_dir_task();
        let m = ws.mirror("headers", "https://example.com/sdl.git", None, None);
        ws.clone_task(m).unwrap();
        let b = ws.ensure_build_dir_task();
        assert_eq!(a, b);
    }
}
