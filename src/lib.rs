//! bindrig - build-automation helper for multi-platform native-binding
//! projects.
//!
//! Native-binding builds need two kinds of remote state before a compiler
//! ever runs: prebuilt binary archives (one per hardware/OS target) from a
//! package registry, and header sources kept checked out from a
//! version-control host. bindrig models both, derives an idempotent task
//! graph from them, and executes exactly the part of that graph a build
//! actually needs.
//!
//! # Architecture
//!
//! The crate is split along the configuration/execution boundary:
//!
//! - [`workspace`] - the construction-phase factory. It owns the entity
//!   arenas and cache tables: a [`registry`] hierarchy (`Server → Project
//!   → PackageRegistry → Package → Artifact`) where every level is
//!   memoized by a coordinate-derived key, and [`mirror`] entries for git
//!   checkouts. Lookups never perform I/O; equal coordinates always
//!   return the identical handle.
//! - [`graph`] - plain task-descriptor records (`name`, `action`,
//!   dependency edges, skip precondition, group label) plus the frozen
//!   [`graph::TaskGraph`] with goal-closure and topological-order
//!   computation.
//! - [`runner`] - the executor. Walks the ordered closure, evaluates each
//!   precondition against the live filesystem, and performs or skips the
//!   action: streamed downloads, zip extraction, cache removal, git
//!   clone/pull.
//! - [`manifest`] - `bindrig.toml` parsing, discovery, and validation;
//!   [`cli`] - the command-line surface (`list`, `sync`, `run`, `clean`,
//!   `validate`).
//!
//! Per artifact the workspace derives three operations: *download* (skip
//! when the cache file exists), *extract* (depends on download, skip when
//! the output directory exists), and *clean* (unconditional removal of
//! the cached file only). Per mirror it derives *clone* (skip when the
//! checkout exists) and *pull* (depends on clone, but skips when the
//! checkout is absent - pull updates, it never creates). Re-running a
//! fully materialized graph is all skips, which is what makes iterative
//! local builds cheap.
//!
//! # Manifest example
//!
//! ```toml
//! [servers.karma]
//! address = "git.karmakrafts.dev"
//!
//! [packages.sdl]
//! server = "karma"
//! project = "kk/multiplatform-sdl"
//! project-name = "sdl"
//! package = "generic/build"
//! version = "3.2.14"
//!
//! [[packages.sdl.artifacts]]
//! file = "build-linux-x64-debug.zip"
//! suffix = "linuxX64"
//!
//! [mirrors.sdl-headers]
//! url = "https://github.com/libsdl-org/SDL"
//! branch = "release-3.2.14"
//! ```
//!
//! Planning that manifest yields tasks like `downloadSdlLinuxX64`,
//! `extractSdlLinuxX64`, `cleanSdlLinuxX64`, `cloneSdlheaders`, and
//! `pullSdlheaders`, addressable individually via `bindrig run` or in
//! bulk via `bindrig sync`.
//!
//! # Library usage
//!
//! ```
//! use bindrig::core::Provider;
//! use bindrig::workspace::Workspace;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut ws = Workspace::new("build");
//! let server = ws.server("git.karmakrafts.dev");
//! let project = ws.project(server, "kk/multiplatform-sdl", Some("sdl"));
//! let version = Provider::fixed("3.2.14".to_string());
//! let package = ws.package_versioned(project, "generic/build", &version);
//! let artifact = ws.artifact(package, "build-linux-x64-debug.zip", "linuxX64", None);
//!
//! // Realizes the download task as a dependency of the extract task.
//! let extract = ws.extract_task(artifact)?;
//! let graph = ws.into_graph();
//! let order = graph.execution_order(&[extract])?;
//! assert_eq!(order.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod core;

// Graph construction
pub mod graph;
pub mod mirror;
pub mod registry;
pub mod workspace;

// Configuration
pub mod manifest;

// Execution
pub mod git;
pub mod runner;

// Surface
pub mod cli;
pub mod utils;
