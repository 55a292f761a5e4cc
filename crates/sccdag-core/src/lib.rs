#![forbid(unsafe_code)]
//! sccdag-core library.
//!
//! Shared building blocks for the pipeline crates: the validated [`Graph`]
//! model, dataset loading, error codes, per-stage [`Metrics`], and the
//! persisted [`RunRecord`].
//!
//! # Conventions
//!
//! - **Errors**: typed [`GraphError`] for graph and pipeline failures;
//!   `anyhow::Result` for file loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod record;

pub use dataset::{Dataset, EdgeRecord};
pub use error::{ErrorCode, GraphError};
pub use metrics::{Metrics, StageMetrics};
pub use model::{Adjacency, DEFAULT_WEIGHT, Digraph, Edge, Graph, WeightedAdjacency, weight_limit};
pub use record::{RECORD_FIELDS, RunRecord};
