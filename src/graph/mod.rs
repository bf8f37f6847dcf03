//! Task descriptors and the build graph they form.
//!
//! Everything the tool ultimately does is expressed as a [`Task`]: a plain
//! record carrying a deterministic name, an [`Action`] describing the side
//! effect, dependency edges, and a [`Precondition`] that decides at
//! execution time whether the action may be skipped. Tasks contain no
//! execution logic; the [`crate::runner`] module interprets them.
//!
//! Construction and execution are separate phases with separate types:
//!
//! - [`TaskSet`] is the mutable, construction-phase container. Task names
//!   are identities - registering a second task under an existing name is
//!   a hard configuration error, while [`TaskSet::get_or_register`] models
//!   tasks that several call sites may lazily materialize.
//! - [`TaskGraph`] is the frozen result handed to an executor. It resolves
//!   goal names, computes dependency closures, and topologically orders
//!   them. `must_run_after` edges constrain ordering but never enlarge the
//!   closure, so requesting one target's extract does not drag in another
//!   target's work.
//!
//! No I/O happens anywhere in this module; preconditions touch the
//! filesystem only when the executor evaluates them.

use crate::core::BindrigError;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::PathBuf;

/// Stable handle for a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

impl TaskId {
    /// Index of this task within its owning set.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The side effect a task performs when it runs.
///
/// Actions are data, not closures: an executor pattern-matches on the
/// variant and performs the described operation, which keeps the graph
/// inspectable and the construction phase free of captured I/O state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Recursively create a directory.
    EnsureDir {
        /// Directory to create.
        path: PathBuf,
    },
    /// Fetch a remote file into the local artifact cache, overwriting any
    /// partial file from an earlier aborted transfer.
    Download {
        /// Fully-formed source URL.
        url: String,
        /// Local cache path the response body streams into.
        dest: PathBuf,
        /// Optional bearer credential passed through to the registry.
        bearer_token: Option<String>,
    },
    /// Unpack a cached zip archive into a directory.
    Extract {
        /// The cached archive.
        archive: PathBuf,
        /// Destination directory for the archive's entries.
        dest: PathBuf,
    },
    /// Delete a cached file; absence is not an error.
    RemoveFile {
        /// File to delete.
        path: PathBuf,
    },
    /// Clone a version-controlled source tree.
    GitClone {
        /// Remote address.
        url: String,
        /// Checkout directory name, relative to `working_dir`.
        directory: String,
        /// Optional branch or tag pin; restricts to a single branch.
        branch: Option<String>,
        /// Directory the clone command runs in.
        working_dir: PathBuf,
    },
    /// Force-update an existing checkout, discarding local divergence.
    GitPull {
        /// Root of the existing checkout.
        repository: PathBuf,
    },
}

/// Decides whether a task's action needs to run at all.
///
/// A skipped task is a successful no-op, not a failure; this is what makes
/// re-running a fully materialized graph free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// The action always runs.
    Always,
    /// Run only while the path does not exist (create-once semantics).
    PathMissing(PathBuf),
    /// Run only while the path exists (update-only semantics - the task
    /// will never create the path itself).
    PathExists(PathBuf),
}

impl Precondition {
    /// Evaluates the predicate against the current filesystem state.
    ///
    /// Executors may call this and the task body non-atomically, which is
    /// fine because every action is idempotent.
    #[must_use]
    pub fn should_run(&self) -> bool {
        match self {
            Self::Always => true,
            Self::PathMissing(path) => !path.exists(),
            Self::PathExists(path) => path.exists(),
        }
    }
}

/// A single named, dependency-linked, precondition-guarded operation.
#[derive(Debug, Clone)]
pub struct Task {
    /// Deterministic name derived from the owning entity's coordinates.
    pub name: String,
    /// Grouping label for discoverability in listings; `None` for
    /// housekeeping tasks that have no natural group.
    pub group: Option<String>,
    /// The side effect to perform.
    pub action: Action,
    /// Tasks that must run before this one and are pulled into the goal
    /// closure with it.
    pub depends_on: Vec<TaskId>,
    /// Tasks that must be ordered before this one when both are already
    /// scheduled; never enlarges the closure.
    pub must_run_after: Vec<TaskId>,
    /// Skip predicate evaluated at execution time.
    pub precondition: Precondition,
}

/// Mutable task container used while the graph is being assembled.
#[derive(Debug, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
}

impl TaskSet {
    /// Creates an empty task set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task under its (unique) name.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::DuplicateTask`] when a task with the same
    /// name already exists. Names are derived from coordinates, so a
    /// collision means two distinct entities mangled to one identity and
    /// the configuration must change.
    pub fn register(&mut self, task: Task) -> Result<TaskId, BindrigError> {
        if self.index.contains_key(&task.name) {
            return Err(BindrigError::DuplicateTask { name: task.name });
        }
        let id = TaskId(self.tasks.len());
        self.index.insert(task.name.clone(), id);
        self.tasks.push(task);
        Ok(id)
    }

    /// Returns the task registered under `name`, creating it on first call.
    ///
    /// This models shared housekeeping tasks (like the build-directory
    /// bootstrap) that any number of call sites may request.
    pub fn get_or_register(&mut self, name: &str, build: impl FnOnce() -> Task) -> TaskId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let task = build();
        debug_assert_eq!(task.name, name, "get_or_register task name mismatch");
        let id = TaskId(self.tasks.len());
        self.index.insert(task.name.clone(), id);
        self.tasks.push(task);
        id
    }

    /// Looks up a task id by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TaskId> {
        self.index.get(name).copied()
    }

    /// Borrows a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    /// Consumes the set into the immutable execution-phase graph.
    #[must_use]
    pub fn freeze(self) -> TaskGraph {
        TaskGraph {
            tasks: self.tasks,
            index: self.index,
        }
    }
}

/// Immutable task graph consumed by an executor.
///
/// Once frozen, the caches behind the graph are gone and nothing can be
/// registered anymore; executors only read.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
}

impl TaskGraph {
    /// Borrows a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Resolves a task name to its id.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::TaskNotFound`] for unknown names.
    pub fn lookup(&self, name: &str) -> Result<TaskId, BindrigError> {
        self.index.get(name).copied().ok_or_else(|| BindrigError::TaskNotFound {
            name: name.to_string(),
        })
    }

    /// Iterates tasks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    /// Ids of all tasks whose descriptor matches `pred`, in registration
    /// order.
    pub fn tasks_matching(&self, mut pred: impl FnMut(&Task) -> bool) -> Vec<TaskId> {
        self.iter().filter(|(_, t)| pred(t)).map(|(id, _)| id).collect()
    }

    /// Computes the ordered execution plan for the given goals.
    ///
    /// The plan is the transitive `depends_on` closure of the goals,
    /// topologically sorted so every dependency precedes its dependents.
    /// `must_run_after` edges between tasks inside the closure constrain
    /// the order but tasks reachable only through such edges are not
    /// scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`BindrigError::CircularDependency`] when the closure's
    /// edges form a cycle.
    pub fn execution_order(&self, goals: &[TaskId]) -> Result<Vec<TaskId>, BindrigError> {
        let mut included = vec![false; self.tasks.len()];
        let mut stack: Vec<TaskId> = goals.to_vec();
        while let Some(id) = stack.pop() {
            if included[id.0] {
                continue;
            }
            included[id.0] = true;
            stack.extend(self.tasks[id.0].depends_on.iter().copied());
        }

        let mut graph: DiGraph<TaskId, ()> = DiGraph::new();
        let mut nodes: HashMap<TaskId, NodeIndex> = HashMap::new();
        for (id, _) in self.iter().filter(|(id, _)| included[id.0]) {
            nodes.insert(id, graph.add_node(id));
        }
        for (&id, &node) in &nodes {
            let task = &self.tasks[id.0];
            for before in task.depends_on.iter().chain(task.must_run_after.iter()) {
                if let Some(&before_node) = nodes.get(before) {
                    graph.add_edge(before_node, node, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|n| graph[n]).collect()),
            Err(cycle) => {
                let id = graph[cycle.node_id()];
                Err(BindrigError::CircularDependency {
                    name: self.tasks[id.0].name.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn noop_task(name: &str) -> Task {
        Task {
            name: name.to_string(),
            group: None,
            action: Action::EnsureDir {
                path: PathBuf::from("build"),
            },
            depends_on: Vec::new(),
            must_run_after: Vec::new(),
            precondition: Precondition::Always,
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut set = TaskSet::new();
        set.register(noop_task("downloadSdlLinuxX64")).unwrap();
        let err = set.register(noop_task("downloadSdlLinuxX64")).unwrap_err();
        assert!(matches!(err, BindrigError::DuplicateTask { name } if name == "downloadSdlLinuxX64"));
    }

    #[test]
    fn get_or_register_returns_one_identity() {
        let mut set = TaskSet::new();
        let first = set.get_or_register("ensureBuildDirectory", || noop_task("ensureBuildDirectory"));
        let second = set.get_or_register("ensureBuildDirectory", || noop_task("ensureBuildDirectory"));
        assert_eq!(first, second);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn execution_order_puts_dependencies_first() {
        let mut set = TaskSet::new();
        let download = set.register(noop_task("download")).unwrap();
        let mut extract = noop_task("extract");
        extract.depends_on.push(download);
        extract.must_run_after.push(download);
        let extract = set.register(extract).unwrap();

        let graph = set.freeze();
        let order = graph.execution_order(&[extract]).unwrap();
        assert_eq!(order, vec![download, extract]);
    }

    #[test]
    fn must_run_after_does_not_enlarge_the_closure() {
        let mut set = TaskSet::new();
        let other = set.register(noop_task("extractOther")).unwrap();
        let mut pull = noop_task("pull");
        pull.must_run_after.push(other);
        let pull = set.register(pull).unwrap();

        let graph = set.freeze();
        let order = graph.execution_order(&[pull]).unwrap();
        assert_eq!(order, vec![pull], "ordering-only edges must not schedule extra work");
    }

    #[test]
    fn must_run_after_orders_tasks_already_in_the_closure() {
        let mut set = TaskSet::new();
        let first = set.register(noop_task("first")).unwrap();
        let mut second = noop_task("second");
        second.must_run_after.push(first);
        let second = set.register(second).unwrap();

        let graph = set.freeze();
        let order = graph.execution_order(&[second, first]).unwrap();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn cycles_are_reported() {
        let mut set = TaskSet::new();
        // Forward-declare ids by registering placeholders, then wire the
        // cycle directly; coordinates can't produce this, but the graph
        // still has to refuse it.
        let a = set.register(noop_task("a")).unwrap();
        let mut b = noop_task("b");
        b.depends_on.push(a);
        let b = set.register(b).unwrap();
        let mut graph = set.freeze();
        graph.tasks[a.index()].depends_on.push(b);

        let err = graph.execution_order(&[b]).unwrap_err();
        assert!(matches!(err, BindrigError::CircularDependency { .. }));
    }

    #[test]
    fn unknown_goal_names_fail_lookup() {
        let graph = TaskSet::new().freeze();
        let err = graph.lookup("nope").unwrap_err();
        assert!(matches!(err, BindrigError::TaskNotFound { name } if name == "nope"));
    }

    #[test]
    fn preconditions_track_filesystem_state() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("cached.zip");

        let missing = Precondition::PathMissing(file.clone());
        let exists = Precondition::PathExists(file.clone());

        assert!(missing.should_run());
        assert!(!exists.should_run());

        std::fs::write(&file, "bytes").unwrap();
        assert!(!missing.should_run());
        assert!(exists.should_run());

        assert!(Precondition::Always.should_run());
    }
}
