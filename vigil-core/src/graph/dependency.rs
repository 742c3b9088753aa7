//! Dependency Edges
//!
//! A dependency is a directed edge from a child checkable to the parent it
//! relies on. Edges are immutable once built and shared (via `Arc`) between
//! the child's dependency set, the parent's reverse-dependency set and the
//! configuration subsystem that created them.
//!
//! Whether an edge currently holds is decided by an [`Availability`]
//! predicate supplied by the caller. Time periods, state filters and disable
//! flags all live behind that predicate; the graph only asks "available for
//! this dependency type, right now?".

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::id::{CheckableId, DependencyId};

/// The purpose of a reachability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Reachability for state changes produced by check results.
    State,

    /// Reachability for running active checks.
    CheckExecution,

    /// Reachability for sending notifications.
    Notification,
}

impl DependencyType {
    /// All dependency types, in declaration order.
    pub const ALL: [DependencyType; 3] = [
        DependencyType::State,
        DependencyType::CheckExecution,
        DependencyType::Notification,
    ];

    /// Whether a service is implicitly coupled to its host for this type.
    pub fn couples_to_host(self) -> bool {
        matches!(self, DependencyType::State | DependencyType::Notification)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyType::State => "state",
            DependencyType::CheckExecution => "check_execution",
            DependencyType::Notification => "notification",
        };
        f.write_str(name)
    }
}

/// Decides whether the parent side of a dependency is currently satisfied.
pub trait Availability: Send + Sync {
    /// Returns true if the dependency holds for the given type.
    fn is_available(&self, dependency_type: DependencyType) -> bool;
}

impl<F> Availability for F
where
    F: Fn(DependencyType) -> bool + Send + Sync,
{
    fn is_available(&self, dependency_type: DependencyType) -> bool {
        self(dependency_type)
    }
}

/// Availability backed by one toggleable flag per dependency type.
///
/// All flags start out available.
#[derive(Debug)]
pub struct AvailabilityFlags {
    state: AtomicBool,
    check_execution: AtomicBool,
    notification: AtomicBool,
}

impl AvailabilityFlags {
    /// Flags with every type available.
    pub fn available() -> Self {
        Self::uniform(true)
    }

    /// Flags with every type unavailable.
    pub fn unavailable() -> Self {
        Self::uniform(false)
    }

    fn uniform(value: bool) -> Self {
        Self {
            state: AtomicBool::new(value),
            check_execution: AtomicBool::new(value),
            notification: AtomicBool::new(value),
        }
    }

    fn flag(&self, dependency_type: DependencyType) -> &AtomicBool {
        match dependency_type {
            DependencyType::State => &self.state,
            DependencyType::CheckExecution => &self.check_execution,
            DependencyType::Notification => &self.notification,
        }
    }

    /// Set availability for a single type.
    pub fn set(&self, dependency_type: DependencyType, available: bool) {
        self.flag(dependency_type).store(available, Ordering::Release);
    }

    /// Set availability for every type at once.
    pub fn set_all(&self, available: bool) {
        for dependency_type in DependencyType::ALL {
            self.set(dependency_type, available);
        }
    }
}

impl Default for AvailabilityFlags {
    fn default() -> Self {
        Self::available()
    }
}

impl Availability for AvailabilityFlags {
    fn is_available(&self, dependency_type: DependencyType) -> bool {
        self.flag(dependency_type).load(Ordering::Acquire)
    }
}

/// A directed edge: `child` depends on `parent`.
pub struct Dependency {
    id: DependencyId,
    name: String,
    child: CheckableId,
    parent: CheckableId,

    /// Empty means the edge is non-redundant.
    redundancy_group: String,

    availability: Arc<dyn Availability>,
}

impl Dependency {
    /// Create a non-redundant dependency of `child` on `parent`.
    pub fn new<A>(
        name: impl Into<String>,
        child: CheckableId,
        parent: CheckableId,
        availability: A,
    ) -> Self
    where
        A: Availability + 'static,
    {
        Self::with_shared_availability(name, child, parent, Arc::new(availability))
    }

    /// Create a dependency whose availability predicate is shared with the caller.
    ///
    /// Useful when the owner of the business rules wants to flip the
    /// predicate after the edge has been wired into the graph.
    pub fn with_shared_availability(
        name: impl Into<String>,
        child: CheckableId,
        parent: CheckableId,
        availability: Arc<dyn Availability>,
    ) -> Self {
        Self {
            id: DependencyId::new(),
            name: name.into(),
            child,
            parent,
            redundancy_group: String::new(),
            availability,
        }
    }

    /// Place this dependency in a redundancy group.
    pub fn in_redundancy_group(mut self, group: impl Into<String>) -> Self {
        self.redundancy_group = group.into();
        self
    }

    /// Get the dependency's ID.
    pub fn id(&self) -> DependencyId {
        self.id
    }

    /// Get the dependency's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The checkable that depends on `parent`.
    pub fn child(&self) -> CheckableId {
        self.child
    }

    /// The checkable being depended on.
    pub fn parent(&self) -> CheckableId {
        self.parent
    }

    /// The redundancy group label, empty if the edge is non-redundant.
    pub fn redundancy_group(&self) -> &str {
        &self.redundancy_group
    }

    /// Whether the edge points from a checkable to itself.
    pub fn is_self_edge(&self) -> bool {
        self.child == self.parent
    }

    /// Ask the availability predicate whether this edge currently holds.
    pub fn is_available(&self, dependency_type: DependencyType) -> bool {
        self.availability.is_available(dependency_type)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("child", &self.child)
            .field("parent", &self.parent)
            .field("redundancy_group", &self.redundancy_group)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dependency_is_non_redundant() {
        let dep = Dependency::new(
            "db",
            CheckableId::new(),
            CheckableId::new(),
            AvailabilityFlags::available(),
        );
        assert_eq!(dep.redundancy_group(), "");
        assert!(!dep.is_self_edge());
    }

    #[test]
    fn redundancy_group_is_recorded() {
        let dep = Dependency::new(
            "uplink-a",
            CheckableId::new(),
            CheckableId::new(),
            AvailabilityFlags::available(),
        )
        .in_redundancy_group("uplinks");
        assert_eq!(dep.redundancy_group(), "uplinks");
    }

    #[test]
    fn closure_predicate_sees_dependency_type() {
        let dep = Dependency::new(
            "notify-only",
            CheckableId::new(),
            CheckableId::new(),
            |dt: DependencyType| dt != DependencyType::Notification,
        );
        assert!(dep.is_available(DependencyType::State));
        assert!(dep.is_available(DependencyType::CheckExecution));
        assert!(!dep.is_available(DependencyType::Notification));
    }

    #[test]
    fn shared_flags_can_be_flipped_after_construction() {
        let flags = Arc::new(AvailabilityFlags::available());
        let dep = Dependency::with_shared_availability(
            "router",
            CheckableId::new(),
            CheckableId::new(),
            flags.clone(),
        );

        assert!(dep.is_available(DependencyType::State));
        flags.set(DependencyType::State, false);
        assert!(!dep.is_available(DependencyType::State));
        assert!(dep.is_available(DependencyType::Notification));

        flags.set_all(false);
        assert!(!dep.is_available(DependencyType::Notification));
    }

    #[test]
    fn self_edge_detection() {
        let id = CheckableId::new();
        let dep = Dependency::new("loop", id, id, AvailabilityFlags::available());
        assert!(dep.is_self_edge());
    }

    #[test]
    fn host_coupling_applies_to_state_and_notification() {
        assert!(DependencyType::State.couples_to_host());
        assert!(DependencyType::Notification.couples_to_host());
        assert!(!DependencyType::CheckExecution.couples_to_host());
    }
}
