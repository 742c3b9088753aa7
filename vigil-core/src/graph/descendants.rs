//! Descendant enumeration.
//!
//! Collects every direct and indirect child of a checkable by expanding the
//! reverse-dependency edges one level at a time. Only nodes discovered in the
//! previous level are expanded again, so a node reached over several paths is
//! visited once per call. Nothing is cached between calls.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::warn;

use super::checkable::Checkable;
use super::registry::DependencyGraph;

impl DependencyGraph {
    /// All direct and indirect children of `checkable`.
    ///
    /// The expansion stops once it goes past `max_recursion_depth` levels.
    /// Deeper descendants are left out and a warning is logged, so the
    /// result may undercount a pathologically deep graph. The checkable
    /// itself only shows up if it is its own descendant through a cycle.
    pub fn all_children(&self, checkable: &Checkable) -> IndexSet<Arc<Checkable>> {
        let limit = self.config().max_recursion_depth;

        let mut all = self.children(checkable);
        let mut frontier: Vec<Arc<Checkable>> = all.iter().cloned().collect();
        let mut level = 0;

        while !frontier.is_empty() {
            if level > limit {
                warn!(
                    checkable = %checkable.name(),
                    limit,
                    omitted_frontier = frontier.len(),
                    "too many nested dependencies, aborting traversal"
                );
                break;
            }

            let mut next = Vec::new();
            for node in &frontier {
                for child in self.children(node) {
                    if all.insert(child.clone()) {
                        next.push(child);
                    }
                }
            }

            frontier = next;
            level += 1;
        }

        all
    }

    /// Number of direct and indirect children of `checkable`.
    ///
    /// Always the size of [`all_children`](Self::all_children): counting
    /// without the set would count shared descendants more than once.
    pub fn all_children_count(&self, checkable: &Checkable) -> usize {
        self.all_children(checkable).len()
    }
}
