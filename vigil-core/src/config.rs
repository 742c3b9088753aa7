//! Graph Configuration
//!
//! Tunables for the dependency graph. Everything has a default, so an empty
//! JSON object is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Default bound on nested dependency levels.
///
/// Anything deeper is treated as a misconfiguration (most likely a cycle).
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 256;

/// Largest accepted `max_recursion_depth`.
///
/// Reachability recurses once per level, so the limit must stay small enough
/// for a cycle to exhaust it on a default-sized thread stack.
pub const MAX_RECURSION_DEPTH_CEILING: usize = DEFAULT_MAX_RECURSION_DEPTH;

/// Configuration for a [`DependencyGraph`](crate::graph::DependencyGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Maximum parent-chain depth for reachability and maximum level count
    /// for descendant enumeration.
    pub max_recursion_depth: usize,
}

impl GraphConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GraphConfig =
            serde_json::from_str(json).map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the graph cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_recursion_depth == 0 {
            return Err(GraphError::InvalidConfig(
                "max_recursion_depth must be greater than zero".to_string(),
            ));
        }
        if self.max_recursion_depth > MAX_RECURSION_DEPTH_CEILING {
            return Err(GraphError::InvalidConfig(format!(
                "max_recursion_depth must not exceed {MAX_RECURSION_DEPTH_CEILING}, got {}",
                self.max_recursion_depth
            )));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}
