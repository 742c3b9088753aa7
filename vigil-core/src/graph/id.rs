//! Graph Identifiers
//!
//! Checkables and dependencies are addressed by opaque ids instead of
//! pointers, so edges never own their endpoints.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a checkable (host or service) in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckableId(u64);

impl CheckableId {
    /// Generate a new unique checkable ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for CheckableId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for CheckableId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CheckableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "checkable#{}", self.0)
    }
}

/// Unique identifier for a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyId(u64);

impl DependencyId {
    /// Generate a new unique dependency ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for DependencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkable_ids_are_unique() {
        let id1 = CheckableId::new();
        let id2 = CheckableId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn dependency_ids_are_unique() {
        let ids: Vec<_> = (0..16).map(|_| DependencyId::new()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn raw_round_trips_through_from() {
        let id = CheckableId::from(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "checkable#42");
    }
}
