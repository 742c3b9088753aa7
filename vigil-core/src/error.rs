//! Error types for the graph registry.
//!
//! Queries never fail: reachability and descendant enumeration degrade to
//! "unreachable" or a truncated set instead. Only wiring the graph and
//! loading configuration can produce an error.

use thiserror::Error;

use crate::graph::CheckableId;

/// The error type for graph registry and configuration operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A dependency endpoint is not registered in the graph.
    #[error("unknown checkable: {0}")]
    UnknownCheckable(CheckableId),

    /// The graph configuration was rejected.
    #[error("invalid graph configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
