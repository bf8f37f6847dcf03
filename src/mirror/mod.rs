//! Entity model for version-controlled header mirrors.
//!
//! A [`Mirror`] is the simpler sibling of a registry artifact: instead of
//! a downloaded archive it represents a clonable source tree, and instead
//! of download/extract/clean it derives a clone/pull task pair. Mirrors
//! are created per call site and are not memoized globally - each
//! declaration owns its task pair, and a colliding task name from two
//! declarations with the same name is a configuration error caught at
//! registration.

use crate::graph::TaskId;
use crate::utils::encode::capitalized;
use std::path::{Path, PathBuf};

/// Handle to a [`Mirror`] in the workspace arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MirrorId(pub(crate) usize);

/// A clonable version-controlled source tree.
#[derive(Debug)]
pub struct Mirror {
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) branch: Option<String>,
    pub(crate) group: String,
    pub(crate) local_path: PathBuf,
    pub(crate) task_stem: String,
    pub(crate) clone_task: Option<TaskId>,
    pub(crate) pull_task: Option<TaskId>,
}

impl Mirror {
    pub(crate) fn new(name: &str, url: &str, branch: Option<&str>, group: Option<&str>, build_root: &Path) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            branch: branch.map(str::to_string),
            group: group.unwrap_or(name).to_string(),
            local_path: build_root.join(name),
            // Dashes vanish from task names: "sdl-headers" clones via
            // "cloneSdlheaders".
            task_stem: capitalized(&name.replace('-', "")),
            clone_task: None,
            pull_task: None,
        }
    }

    /// Mirror name; doubles as the checkout directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote address of the source tree.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Optional branch or tag pin; clones become single-branch.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Task grouping label; defaults to the mirror name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Local checkout path, `<buildRoot>/<name>`.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}
