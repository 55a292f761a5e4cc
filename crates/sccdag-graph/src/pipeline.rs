//! One full run: SCC → condensation → topological order → DAG paths.
//!
//! The scheduler sees the unweighted condensation and the path solver the
//! weighted one; both have the same node ids and successor order, so the
//! order computed on one is valid for the other.

use tracing::{info, instrument};

use sccdag_core::record::StageInputs;
use sccdag_core::{Adjacency, Digraph, Graph, GraphError, Metrics, RunRecord, StageMetrics};

use crate::condense::{CondensedGraph, condense, condense_membership};
use crate::paths::{
    CriticalPath, LongestPaths, ShortestPaths, critical_path, longest_from, shortest_from,
};
use crate::scc::{Components, tarjan};
use crate::topo::kahn;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub components: Components,
    /// Weighted condensation, fed to the path solver.
    pub condensed: CondensedGraph,
    /// Unweighted condensation, fed to the scheduler.
    pub membership: Digraph,
    /// Topological order over component ids.
    pub order: Vec<usize>,
    /// `order` with each component expanded to its members.
    pub vertex_order: Vec<usize>,
    /// Source vertex; `None` only for the empty graph.
    pub source: Option<usize>,
    /// Component of `source`.
    pub source_component: Option<usize>,
    /// Shortest distances over component ids.
    pub shortest: ShortestPaths,
    /// Longest distances over component ids.
    pub longest: LongestPaths,
    /// Critical path over component ids.
    pub critical: Option<CriticalPath>,
    /// Metrics per stage, in execution order.
    pub stages: Vec<StageMetrics>,
    pub record: RunRecord,
}

impl PipelineOutput {
    /// Length of the critical path, `0` when nothing is reachable.
    #[must_use]
    pub fn longest_max(&self) -> i64 {
        self.longest.max_distance().unwrap_or(0)
    }
}

/// Run every stage over `graph`, measuring paths from `source`.
///
/// `source` defaults to vertex `0`. An empty graph with no explicit source
/// succeeds with empty results.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `source` is not a vertex of
///   `graph`. Checked before any stage runs.
/// - [`GraphError::CycleSurvivedCondensation`] if the condensation is not
///   acyclic (internal error).
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn run(graph: &Graph, source: Option<i64>) -> Result<PipelineOutput, GraphError> {
    let source = if graph.is_empty() && source.is_none() {
        None
    } else {
        Some(graph.check_source(source.unwrap_or(0))?)
    };

    let mut scc_metrics = Metrics::new();
    let components = tarjan(graph, &mut scc_metrics);

    let mut condense_metrics = Metrics::new();
    let (condensed, membership) = condense_metrics.timed(|_| {
        (
            condense(graph, &components),
            condense_membership(graph, &components),
        )
    });

    let mut topo_metrics = Metrics::new();
    let order = kahn(&membership, &mut topo_metrics)?;
    let vertex_order = components.expand_order(&order);

    let source_component = source.map(|v| components.component_of(v));

    let mut shortest_metrics = Metrics::new();
    let mut longest_metrics = Metrics::new();
    let (shortest, longest) = match source_component {
        Some(c) => (
            shortest_from(c, &order, &condensed, &mut shortest_metrics)?,
            longest_from(c, &order, &condensed, &mut longest_metrics)?,
        ),
        None => (ShortestPaths::default(), LongestPaths::default()),
    };
    let critical = critical_path(&longest);
    let longest_max = longest.max_distance().unwrap_or(0);

    let record = RunRecord::from_stages(StageInputs {
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        scc_count: components.len(),
        longest_max,
        scc: &scc_metrics,
        topo: &topo_metrics,
        shortest: &shortest_metrics,
        longest: &longest_metrics,
    });

    info!(
        components = components.len(),
        condensed_nodes = condensed.node_count(),
        condensed_edges = condensed.edge_count(),
        longest_max,
        "pipeline run complete"
    );

    let stages = vec![
        StageMetrics {
            stage: "scc",
            metrics: scc_metrics,
        },
        StageMetrics {
            stage: "condense",
            metrics: condense_metrics,
        },
        StageMetrics {
            stage: "topo",
            metrics: topo_metrics,
        },
        StageMetrics {
            stage: "shortest",
            metrics: shortest_metrics,
        },
        StageMetrics {
            stage: "longest",
            metrics: longest_metrics,
        },
    ];

    Ok(PipelineOutput {
        components,
        condensed,
        membership,
        order,
        vertex_order,
        source,
        source_component,
        shortest,
        longest,
        critical,
        stages,
        record,
    })
}
