#![forbid(unsafe_code)]
//! sccdag-graph library.
//!
//! The graph pipeline over a [`sccdag_core::Graph`]:
//!
//! 1. [`scc::tarjan`] partitions the vertices into strongly connected
//!    components.
//! 2. [`condense::condense`] collapses each component to one node, giving a
//!    DAG.
//! 3. [`topo::kahn`] orders that DAG.
//! 4. [`paths::shortest_from`] / [`paths::longest_from`] solve single-source
//!    distances over the order, and [`paths::critical_path`] picks the
//!    longest one.
//!
//! [`pipeline::run`] chains all of it for one dataset.
//!
//! # Conventions
//!
//! - Every stage takes a `&mut Metrics` for its own timing and counters.
//! - Results are deterministic: iteration follows vertex id and adjacency
//!   order everywhere, never hash order.

pub mod condense;
pub mod paths;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use condense::{CondensedGraph, condense, condense_membership};
pub use paths::{
    CriticalPath, LONGEST_UNREACHABLE, LongestPaths, SHORTEST_UNREACHABLE, ShortestPaths,
    critical_path, longest_from, rebuild_path, shortest_from,
};
pub use pipeline::{PipelineOutput, run};
pub use scc::{Component, Components, tarjan};
pub use topo::{is_topological_order, kahn};
