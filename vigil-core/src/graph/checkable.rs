//! Checkables
//!
//! A checkable is a monitored entity: a host, or a service that optionally
//! runs on a host. Each checkable owns two edge sets:
//!
//! - `dependencies`: edges where this checkable is the child (toward parents)
//! - `reverse_dependencies`: edges where this checkable is the parent
//!
//! # Thread Safety
//!
//! Both sets sit behind one mutex per checkable. Every operation takes the
//! lock only for a single insert, erase or copy. Readers get an
//! [`EdgeSnapshot`], a point-in-time copy, and never a live view, so no code
//! path ever holds two checkables' locks at once.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::dependency::Dependency;
use super::id::{CheckableId, DependencyId};

/// Point-in-time copy of one of a checkable's edge sets.
pub type EdgeSnapshot = SmallVec<[Arc<Dependency>; 4]>;

/// Current state of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    Up,
    Down,
    Unreachable,
}

/// Whether a state is confirmed or still being retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateType {
    Soft,
    Hard,
}

/// Host state paired with its state type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    pub state: HostState,
    pub state_type: StateType,
}

impl HostStatus {
    /// A host that is up (hard).
    pub fn up() -> Self {
        Self {
            state: HostState::Up,
            state_type: StateType::Hard,
        }
    }

    /// True if the host is in a confirmed non-Up state.
    pub fn is_hard_problem(&self) -> bool {
        self.state != HostState::Up && self.state_type == StateType::Hard
    }
}

impl Default for HostStatus {
    fn default() -> Self {
        Self::up()
    }
}

/// What kind of checkable this is.
#[derive(Debug)]
pub enum CheckableKind {
    /// A host. Its status is updated by the check result pipeline.
    Host(RwLock<HostStatus>),

    /// A service, optionally bound to the host it runs on.
    Service { host: Option<CheckableId> },
}

/// Both edge sets, keyed by dependency id so duplicates collapse.
#[derive(Default)]
struct EdgeSets {
    dependencies: IndexMap<DependencyId, Arc<Dependency>>,
    reverse_dependencies: IndexMap<DependencyId, Arc<Dependency>>,
}

/// A node in the dependency graph.
pub struct Checkable {
    id: CheckableId,
    name: String,
    kind: CheckableKind,
    edges: Mutex<EdgeSets>,
}

impl Checkable {
    /// Create a new host that starts out up.
    pub fn host(name: impl Into<String>) -> Self {
        Self::new(name, CheckableKind::Host(RwLock::new(HostStatus::up())))
    }

    /// Create a new service bound to `host`.
    pub fn service(name: impl Into<String>, host: Option<CheckableId>) -> Self {
        Self::new(name, CheckableKind::Service { host })
    }

    fn new(name: impl Into<String>, kind: CheckableKind) -> Self {
        Self {
            id: CheckableId::new(),
            name: name.into(),
            kind,
            edges: Mutex::new(EdgeSets::default()),
        }
    }

    /// Get the checkable's ID.
    pub fn id(&self) -> CheckableId {
        self.id
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the checkable's kind.
    pub fn kind(&self) -> &CheckableKind {
        &self.kind
    }

    /// True for hosts.
    pub fn is_host(&self) -> bool {
        matches!(self.kind, CheckableKind::Host(_))
    }

    /// The host this checkable runs on. Always `None` for hosts.
    pub fn owning_host(&self) -> Option<CheckableId> {
        match &self.kind {
            CheckableKind::Host(_) => None,
            CheckableKind::Service { host } => *host,
        }
    }

    /// Current host status, `None` for services.
    pub fn host_status(&self) -> Option<HostStatus> {
        match &self.kind {
            CheckableKind::Host(status) => Some(*status.read()),
            CheckableKind::Service { .. } => None,
        }
    }

    /// Record a new host state.
    ///
    /// Returns false (and changes nothing) if this checkable is a service.
    pub fn set_host_state(&self, state: HostState, state_type: StateType) -> bool {
        match &self.kind {
            CheckableKind::Host(status) => {
                *status.write() = HostStatus { state, state_type };
                true
            }
            CheckableKind::Service { .. } => false,
        }
    }

    /// Add an edge where this checkable is the child.
    ///
    /// Returns false if the edge was already present.
    pub fn add_dependency(&self, dependency: Arc<Dependency>) -> bool {
        self.edges
            .lock()
            .dependencies
            .insert(dependency.id(), dependency)
            .is_none()
    }

    /// Remove an edge where this checkable is the child.
    ///
    /// Returns false if the edge was not present.
    pub fn remove_dependency(&self, dependency: &Dependency) -> bool {
        self.edges
            .lock()
            .dependencies
            .shift_remove(&dependency.id())
            .is_some()
    }

    /// Snapshot of the edges toward this checkable's parents.
    pub fn dependencies(&self) -> EdgeSnapshot {
        self.edges.lock().dependencies.values().cloned().collect()
    }

    /// Add an edge where this checkable is the parent.
    ///
    /// Returns false if the edge was already present.
    pub fn add_reverse_dependency(&self, dependency: Arc<Dependency>) -> bool {
        self.edges
            .lock()
            .reverse_dependencies
            .insert(dependency.id(), dependency)
            .is_none()
    }

    /// Remove an edge where this checkable is the parent.
    ///
    /// Returns false if the edge was not present.
    pub fn remove_reverse_dependency(&self, dependency: &Dependency) -> bool {
        self.edges
            .lock()
            .reverse_dependencies
            .shift_remove(&dependency.id())
            .is_some()
    }

    /// Snapshot of the edges from this checkable's children.
    pub fn reverse_dependencies(&self) -> EdgeSnapshot {
        self.edges
            .lock()
            .reverse_dependencies
            .values()
            .cloned()
            .collect()
    }
}

impl PartialEq for Checkable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Checkable {}

impl Hash for Checkable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Checkable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkable")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AvailabilityFlags;

    fn edge(child: &Checkable, parent: &Checkable) -> Arc<Dependency> {
        Arc::new(Dependency::new(
            format!("{}->{}", child.name(), parent.name()),
            child.id(),
            parent.id(),
            AvailabilityFlags::available(),
        ))
    }

    #[test]
    fn host_starts_up_and_service_has_no_status() {
        let host = Checkable::host("web01");
        let service = Checkable::service("http", Some(host.id()));

        assert!(host.is_host());
        assert_eq!(host.host_status(), Some(HostStatus::up()));
        assert_eq!(host.owning_host(), None);

        assert!(!service.is_host());
        assert_eq!(service.host_status(), None);
        assert_eq!(service.owning_host(), Some(host.id()));
    }

    #[test]
    fn set_host_state_only_applies_to_hosts() {
        let host = Checkable::host("web01");
        let service = Checkable::service("http", Some(host.id()));

        assert!(host.set_host_state(HostState::Down, StateType::Soft));
        let status = host.host_status().unwrap();
        assert_eq!(status.state, HostState::Down);
        assert!(!status.is_hard_problem());

        assert!(host.set_host_state(HostState::Down, StateType::Hard));
        assert!(host.host_status().unwrap().is_hard_problem());

        assert!(!service.set_host_state(HostState::Down, StateType::Hard));
    }

    #[test]
    fn duplicate_add_and_absent_remove_are_no_ops() {
        let child = Checkable::host("child");
        let parent = Checkable::host("parent");
        let dep = edge(&child, &parent);

        assert!(child.add_dependency(dep.clone()));
        assert!(!child.add_dependency(dep.clone()));
        assert_eq!(child.dependencies().len(), 1);

        assert!(child.remove_dependency(&dep));
        assert!(!child.remove_dependency(&dep));
        assert!(child.dependencies().is_empty());
    }

    #[test]
    fn forward_and_reverse_sets_are_independent() {
        let child = Checkable::host("child");
        let parent = Checkable::host("parent");
        let dep = edge(&child, &parent);

        parent.add_reverse_dependency(dep.clone());
        assert!(parent.dependencies().is_empty());
        assert_eq!(parent.reverse_dependencies().len(), 1);

        parent.remove_reverse_dependency(&dep);
        assert!(parent.reverse_dependencies().is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let child = Checkable::host("child");
        let parent = Checkable::host("parent");
        let first = edge(&child, &parent);
        let second = edge(&child, &parent);

        child.add_dependency(first.clone());
        let snapshot = child.dependencies();

        child.add_dependency(second);
        child.remove_dependency(&first);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), first.id());
        assert_eq!(child.dependencies().len(), 1);
    }

    #[test]
    fn snapshots_keep_insertion_order() {
        let child = Checkable::host("child");
        let parents: Vec<_> = (0..6).map(|i| Checkable::host(format!("p{i}"))).collect();
        let deps: Vec<_> = parents.iter().map(|p| edge(&child, p)).collect();

        for dep in &deps {
            child.add_dependency(dep.clone());
        }
        child.remove_dependency(&deps[2]);

        let names: Vec<_> = child
            .dependencies()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["child->p0", "child->p1", "child->p3", "child->p4", "child->p5"]
        );
    }
}
