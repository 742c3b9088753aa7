//! Vigil Core
//!
//! This crate provides the dependency-graph core of the Vigil monitoring
//! engine. It implements:
//!
//! - The graph of checkables (hosts and services) and their dependencies
//! - Reachability queries with redundancy groups and host/service coupling
//! - Descendant enumeration for impact analysis
//!
//! The crate decides *whether* a checkable is reachable. What to do with
//! that verdict (skip a check, hold back a notification) is up to the
//! caller.
//!
//! # Architecture
//!
//! - `graph`: checkables, dependencies, the registry and the queries on it
//! - `config`: tunables such as the recursion limit
//! - `error`: errors raised while wiring the graph
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vigil_core::graph::{AvailabilityFlags, Dependency, DependencyGraph, DependencyType};
//!
//! let graph = DependencyGraph::new();
//! let router = graph.insert_host("router");
//! let server = graph.insert_host("server");
//!
//! let uplink = Arc::new(AvailabilityFlags::available());
//! graph
//!     .link_dependency(Arc::new(Dependency::with_shared_availability(
//!         "server-uplink",
//!         server.id(),
//!         router.id(),
//!         uplink.clone(),
//!     )))
//!     .unwrap();
//!
//! assert!(graph.is_reachable(&server, DependencyType::State));
//!
//! uplink.set_all(false);
//! let verdict = graph.reachability(&server, DependencyType::Notification);
//! assert_eq!(verdict.failed_dependency().unwrap().name(), "server-uplink");
//! ```

pub mod config;
pub mod error;
pub mod graph;

pub use config::GraphConfig;
pub use error::{GraphError, Result};
