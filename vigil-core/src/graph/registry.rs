//! Graph Registry
//!
//! The registry is the arena every checkable lives in. Dependencies refer to
//! their endpoints by [`CheckableId`], and the registry resolves those ids
//! back to checkables when a query walks the graph.
//!
//! Lookups clone the `Arc` out of the map and drop the map guard right
//! away, so no map shard is held while a checkable's edge lock is taken.

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexSet;
use tracing::debug;

use super::checkable::Checkable;
use super::dependency::Dependency;
use super::id::CheckableId;
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// The dependency graph: all checkables plus the query surface over them.
pub struct DependencyGraph {
    /// All checkables, indexed by ID.
    checkables: DashMap<CheckableId, Arc<Checkable>>,

    config: GraphConfig,
}

impl DependencyGraph {
    /// Create an empty graph with the default configuration.
    pub fn new() -> Self {
        Self {
            checkables: DashMap::new(),
            config: GraphConfig::default(),
        }
    }

    /// Create an empty graph with the given configuration.
    ///
    /// The configuration is validated first, so a graph never runs with a
    /// recursion limit its callers' stacks cannot afford.
    pub fn with_config(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            checkables: DashMap::new(),
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Register a checkable.
    ///
    /// Checkable ids are allocated at construction, so a checkable can only
    /// be registered once.
    pub fn insert(&self, checkable: Checkable) -> Arc<Checkable> {
        let checkable = Arc::new(checkable);
        self.checkables.insert(checkable.id(), checkable.clone());
        checkable
    }

    /// Create and register a host.
    pub fn insert_host(&self, name: impl Into<String>) -> Arc<Checkable> {
        self.insert(Checkable::host(name))
    }

    /// Create and register a service bound to `host`.
    pub fn insert_service(
        &self,
        name: impl Into<String>,
        host: Option<CheckableId>,
    ) -> Arc<Checkable> {
        self.insert(Checkable::service(name, host))
    }

    /// Look up a checkable by ID.
    pub fn get(&self, id: CheckableId) -> Option<Arc<Checkable>> {
        self.checkables.get(&id).map(|entry| entry.value().clone())
    }

    /// Remove a checkable from the graph.
    ///
    /// Its edges are also detached from the checkables on the other end.
    pub fn remove(&self, id: CheckableId) -> Option<Arc<Checkable>> {
        let (_, checkable) = self.checkables.remove(&id)?;

        for dependency in checkable.dependencies() {
            if let Some(parent) = self.get(dependency.parent()) {
                parent.remove_reverse_dependency(&dependency);
            }
        }
        for dependency in checkable.reverse_dependencies() {
            if let Some(child) = self.get(dependency.child()) {
                child.remove_dependency(&dependency);
            }
        }

        Some(checkable)
    }

    /// Get the total number of checkables in the graph.
    pub fn len(&self) -> usize {
        self.checkables.len()
    }

    /// True if no checkables are registered.
    pub fn is_empty(&self) -> bool {
        self.checkables.is_empty()
    }

    /// All registered checkables, ordered by ID.
    pub fn checkables(&self) -> Vec<Arc<Checkable>> {
        let mut all: Vec<_> = self
            .checkables
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|checkable| checkable.id());
        all
    }

    /// Wire a dependency into both of its endpoints.
    ///
    /// Nothing is mutated unless both endpoints are registered.
    pub fn link_dependency(&self, dependency: Arc<Dependency>) -> Result<()> {
        let child = self
            .get(dependency.child())
            .ok_or(GraphError::UnknownCheckable(dependency.child()))?;
        let parent = self
            .get(dependency.parent())
            .ok_or(GraphError::UnknownCheckable(dependency.parent()))?;

        let added = child.add_dependency(dependency.clone());
        parent.add_reverse_dependency(dependency.clone());

        debug!(
            dependency = %dependency.name(),
            child = %child.name(),
            parent = %parent.name(),
            added,
            "linked dependency"
        );
        Ok(())
    }

    /// Detach a dependency from both of its endpoints.
    ///
    /// Endpoints that are no longer registered are skipped.
    pub fn unlink_dependency(&self, dependency: &Dependency) {
        let from_child = self
            .get(dependency.child())
            .is_some_and(|child| child.remove_dependency(dependency));
        let from_parent = self
            .get(dependency.parent())
            .is_some_and(|parent| parent.remove_reverse_dependency(dependency));

        debug!(
            dependency = %dependency.name(),
            from_child,
            from_parent,
            "unlinked dependency"
        );
    }

    /// Distinct parents of `checkable`, in first-seen order.
    ///
    /// Self-edges and parents that are not registered are skipped.
    pub fn parents(&self, checkable: &Checkable) -> IndexSet<Arc<Checkable>> {
        checkable
            .dependencies()
            .iter()
            .filter(|dependency| dependency.parent() != checkable.id())
            .filter_map(|dependency| self.get(dependency.parent()))
            .collect()
    }

    /// Distinct direct children of `checkable`, in first-seen order.
    ///
    /// Self-edges and children that are not registered are skipped.
    pub fn children(&self, checkable: &Checkable) -> IndexSet<Arc<Checkable>> {
        checkable
            .reverse_dependencies()
            .iter()
            .filter(|dependency| dependency.child() != checkable.id())
            .filter_map(|dependency| self.get(dependency.child()))
            .collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
