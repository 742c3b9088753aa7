//! Dependency Graph
//!
//! This module implements the graph of checkables (hosts and services) and
//! the dependencies between them.
//!
//! # Overview
//!
//! - Nodes are [`Checkable`]s, owned by the [`DependencyGraph`] registry.
//! - Edges are [`Dependency`]s: `child` depends on `parent`. Each edge sits in
//!   the child's dependency set and in the parent's reverse-dependency set.
//!
//! Edges name their endpoints by id and checkables own their edges, so a
//! cyclic configuration never turns into an ownership cycle.
//!
//! # Design Decisions
//!
//! 1. There is no global graph lock. Each checkable guards its own edge sets
//!    and hands out copies, so a traversal sees a sequence of per-node
//!    snapshots rather than one consistent picture of the whole graph.
//!
//! 2. Cycles are not detected up front. Reachability and descendant
//!    enumeration are bounded by `max_recursion_depth` instead, and give a
//!    degraded answer (unreachable, or a truncated set) when they hit it.
//!
//! 3. Iteration order everywhere is insertion order, which keeps the reported
//!    failed dependency stable from one query to the next.

mod checkable;
mod dependency;
mod descendants;
mod id;
mod reachability;
mod registry;

pub use checkable::{Checkable, CheckableKind, EdgeSnapshot, HostState, HostStatus, StateType};
pub use dependency::{Availability, AvailabilityFlags, Dependency, DependencyType};
pub use id::{CheckableId, DependencyId};
pub use reachability::{Reachability, UnreachableCause};
pub use registry::DependencyGraph;
