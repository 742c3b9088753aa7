//! Reachability
//!
//! Decides whether a checkable is reachable for a given [`DependencyType`].
//! The scheduler asks before running an active check, the notifier asks
//! before sending an alert.
//!
//! # Algorithm
//!
//! 1. Bail out as unreachable once the parent chain gets deeper than
//!    `max_recursion_depth`. This is the only cycle protection: a cycle simply
//!    runs out of depth.
//! 2. Every distinct parent must itself be reachable. The first parent that
//!    is not decides the result, including its failed dependency.
//! 3. A service whose host is in a hard non-Up state is unreachable for
//!    `State` and `Notification` queries.
//! 4. Own edges: an unavailable edge without a redundancy group fails the
//!    query at once. Grouped edges fail only if no member of their group is
//!    available.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::checkable::Checkable;
use super::dependency::{Dependency, DependencyType};
use super::id::CheckableId;
use super::registry::DependencyGraph;

/// Why a checkable is unreachable.
#[derive(Debug, Clone)]
pub enum UnreachableCause {
    /// This dependency (or the first violating member of its redundancy
    /// group) is unavailable.
    FailedDependency(Arc<Dependency>),

    /// The owning host is in a hard non-Up state.
    HostNotUp { host: CheckableId },

    /// The parent chain exceeded the recursion limit at this checkable.
    TooDeep { checkable: CheckableId },
}

impl fmt::Display for UnreachableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreachableCause::FailedDependency(dependency) => {
                write!(f, "dependency '{}' failed", dependency.name())
            }
            UnreachableCause::HostNotUp { host } => write!(f, "host {host} is not up"),
            UnreachableCause::TooDeep { checkable } => {
                write!(f, "too many nested dependencies at {checkable}")
            }
        }
    }
}

/// Result of a reachability query.
#[derive(Debug, Clone)]
pub enum Reachability {
    Reachable,
    Unreachable(UnreachableCause),
}

impl Reachability {
    /// True if the checkable is reachable.
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }

    /// The cause, if unreachable.
    pub fn cause(&self) -> Option<&UnreachableCause> {
        match self {
            Reachability::Reachable => None,
            Reachability::Unreachable(cause) => Some(cause),
        }
    }

    /// The dependency edge that broke reachability.
    ///
    /// `None` when reachable, and also when the host rule or the recursion
    /// limit made the checkable unreachable.
    pub fn failed_dependency(&self) -> Option<&Arc<Dependency>> {
        match self.cause() {
            Some(UnreachableCause::FailedDependency(dependency)) => Some(dependency),
            _ => None,
        }
    }
}

impl DependencyGraph {
    /// Whether `checkable` is reachable for `dependency_type`.
    pub fn is_reachable(&self, checkable: &Checkable, dependency_type: DependencyType) -> bool {
        self.reachability(checkable, dependency_type).is_reachable()
    }

    /// Reachability of `checkable`, with the reason when it is unreachable.
    pub fn reachability(
        &self,
        checkable: &Checkable,
        dependency_type: DependencyType,
    ) -> Reachability {
        self.reachability_at(checkable, dependency_type, 0)
    }

    fn reachability_at(
        &self,
        checkable: &Checkable,
        dependency_type: DependencyType,
        depth: usize,
    ) -> Reachability {
        let limit = self.config().max_recursion_depth;
        if depth > limit {
            warn!(
                checkable = %checkable.name(),
                limit,
                "too many nested dependencies, marking as unreachable"
            );
            return Reachability::Unreachable(UnreachableCause::TooDeep {
                checkable: checkable.id(),
            });
        }

        for parent in self.parents(checkable) {
            let verdict = self.reachability_at(&parent, dependency_type, depth + 1);
            if !verdict.is_reachable() {
                return verdict;
            }
        }

        if dependency_type.couples_to_host() {
            if let Some(host) = checkable.owning_host().and_then(|id| self.get(id)) {
                if host.host_status().is_some_and(|status| status.is_hard_problem()) {
                    debug!(
                        checkable = %checkable.name(),
                        host = %host.name(),
                        "host is not up, marking service as unreachable"
                    );
                    return Reachability::Unreachable(UnreachableCause::HostNotUp {
                        host: host.id(),
                    });
                }
            }
        }

        let dependencies = checkable.dependencies();

        // Redundancy group -> None if satisfied, violating edge otherwise.
        let mut groups: IndexMap<&str, Option<&Arc<Dependency>>> = IndexMap::new();

        for dependency in &dependencies {
            let group = dependency.redundancy_group();

            if !dependency.is_available(dependency_type) {
                if group.is_empty() {
                    debug!(
                        checkable = %checkable.name(),
                        dependency = %dependency.name(),
                        "non-redundant dependency failed, marking as unreachable"
                    );
                    return Reachability::Unreachable(UnreachableCause::FailedDependency(
                        dependency.clone(),
                    ));
                }

                // Keep an earlier success or an earlier violator.
                groups.entry(group).or_insert(Some(dependency));
            } else if !group.is_empty() {
                groups.insert(group, None);
            }
        }

        let violator = groups
            .iter()
            .find_map(|(group, violator)| violator.map(|dependency| (*group, dependency)));

        if let Some((group, dependency)) = violator {
            debug!(
                checkable = %checkable.name(),
                group,
                "all dependencies in redundancy group failed, marking as unreachable"
            );
            return Reachability::Unreachable(UnreachableCause::FailedDependency(
                dependency.clone(),
            ));
        }

        Reachability::Reachable
    }
}
