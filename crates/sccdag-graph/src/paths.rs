//! Single-source shortest and longest paths over a DAG.
//!
//! # Algorithm
//!
//! Both solvers walk the nodes in topological order and relax every
//! outgoing edge of each reachable node. Processing in topological order
//! guarantees a node's distance is final before it is used, so one pass
//! suffices and negative weights are fine.
//!
//! # Sentinels
//!
//! Unreachable nodes keep a sentinel distance:
//!
//! | solver   | sentinel                | meaning |
//! |----------|-------------------------|---------|
//! | shortest | [`SHORTEST_UNREACHABLE`] | +∞      |
//! | longest  | [`LONGEST_UNREACHABLE`]  | −∞      |
//!
//! The sentinels only fill the output: reachability is tracked in a separate
//! `reached` flag per node, so a real distance that happens to equal a
//! sentinel is still reported as reachable. Unreachable nodes are never
//! relaxed from. Callers must check [`ShortestPaths::is_reachable`] /
//! [`LongestPaths::is_reachable`] (or use the `distance` accessors, which
//! return `None`) before treating a value as a distance.
//!
//! [`Graph::new`](sccdag_core::Graph::new) bounds every weight by
//! `i64::MAX / n`, so no simple path sum can overflow.
//!
//! # Critical path
//!
//! The longest solver records, for every improvement, the predecessor that
//! produced it. Comparisons are strict, so on ties the first predecessor
//! found in topological order is kept. [`critical_path`] picks the node
//! with the strictly largest finite distance (lowest id on ties) and walks
//! the parents back to the source.

use serde::Serialize;
use tracing::{debug, instrument};

use sccdag_core::{GraphError, Metrics, WeightedAdjacency};

/// Distance of nodes the shortest-path source cannot reach.
pub const SHORTEST_UNREACHABLE: i64 = i64::MAX / 4;

/// Distance of nodes the longest-path source cannot reach.
pub const LONGEST_UNREACHABLE: i64 = i64::MIN / 4;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Shortest distances from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShortestPaths {
    /// Distance per node; [`SHORTEST_UNREACHABLE`] if unreachable.
    pub dist: Vec<i64>,
    /// Whether the source reaches each node.
    pub reached: Vec<bool>,
}

impl ShortestPaths {
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.reached[node]
    }

    /// Distance to `node`, or `None` if it is unreachable.
    #[must_use]
    pub fn distance(&self, node: usize) -> Option<i64> {
        self.is_reachable(node).then(|| self.dist[node])
    }
}

/// Longest distances from one source, with parent pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LongestPaths {
    /// Distance per node; [`LONGEST_UNREACHABLE`] if unreachable.
    pub dist: Vec<i64>,
    /// Predecessor on the longest path; `None` for the source and for
    /// unreachable nodes.
    pub parent: Vec<Option<usize>>,
    /// Whether the source reaches each node.
    pub reached: Vec<bool>,
}

impl LongestPaths {
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.reached[node]
    }

    /// Distance to `node`, or `None` if it is unreachable.
    #[must_use]
    pub fn distance(&self, node: usize) -> Option<i64> {
        self.is_reachable(node).then(|| self.dist[node])
    }

    /// Largest finite distance, if any node is reachable.
    #[must_use]
    pub fn max_distance(&self) -> Option<i64> {
        self.dist
            .iter()
            .zip(&self.reached)
            .filter_map(|(&d, &reached)| reached.then_some(d))
            .max()
    }
}

/// The maximum-weight path from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Last node of the path.
    pub target: usize,
    /// Summed edge weight of the path.
    pub length: i64,
    /// Nodes from the source to `target`.
    pub nodes: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

/// Shortest distances from `source`, relaxing in `order`.
///
/// `order` must be a topological order of `graph`. `metrics` is timed over
/// the pass and receives one `relax_ops` increment per successful
/// relaxation.
///
/// # Errors
///
/// Returns [`GraphError::SourceOutOfRange`] if `source` is not a node of
/// `graph`.
#[instrument(skip(order, graph, metrics), fields(nodes = graph.node_count()))]
pub fn shortest_from(
    source: usize,
    order: &[usize],
    graph: &impl WeightedAdjacency,
    metrics: &mut Metrics,
) -> Result<ShortestPaths, GraphError> {
    check_source(source, graph.node_count())?;
    metrics.start();

    let n = graph.node_count();
    let mut dist = vec![SHORTEST_UNREACHABLE; n];
    let mut reached = vec![false; n];
    dist[source] = 0;
    reached[source] = true;

    for &v in order {
        if !reached[v] {
            continue;
        }
        for (to, w) in graph.out_edges(v) {
            let candidate = dist[v].saturating_add(w);
            if !reached[to] || candidate < dist[to] {
                dist[to] = candidate;
                reached[to] = true;
                metrics.inc_relax();
            }
        }
    }

    metrics.stop();
    debug!(relax_ops = metrics.relax_ops(), "shortest distances computed");
    Ok(ShortestPaths { dist, reached })
}

/// Longest distances and parent pointers from `source`, relaxing in
/// `order`.
///
/// Same contract as [`shortest_from`], with strict `>` comparisons.
///
/// # Errors
///
/// Returns [`GraphError::SourceOutOfRange`] if `source` is not a node of
/// `graph`.
#[instrument(skip(order, graph, metrics), fields(nodes = graph.node_count()))]
pub fn longest_from(
    source: usize,
    order: &[usize],
    graph: &impl WeightedAdjacency,
    metrics: &mut Metrics,
) -> Result<LongestPaths, GraphError> {
    check_source(source, graph.node_count())?;
    metrics.start();

    let n = graph.node_count();
    let mut dist = vec![LONGEST_UNREACHABLE; n];
    let mut parent = vec![None; n];
    let mut reached = vec![false; n];
    dist[source] = 0;
    reached[source] = true;

    for &v in order {
        if !reached[v] {
            continue;
        }
        for (to, w) in graph.out_edges(v) {
            let candidate = dist[v].saturating_add(w);
            if !reached[to] || candidate > dist[to] {
                dist[to] = candidate;
                parent[to] = Some(v);
                reached[to] = true;
                metrics.inc_relax();
            }
        }
    }

    metrics.stop();
    debug!(relax_ops = metrics.relax_ops(), "longest distances computed");
    Ok(LongestPaths {
        dist,
        parent,
        reached,
    })
}

/// Walk parent pointers from `target` back to a node without a parent and
/// return the nodes in source-to-target order.
///
/// For an unreachable `target` the result is `[target]`; check
/// [`LongestPaths::is_reachable`] before trusting it.
#[must_use]
pub fn rebuild_path(target: usize, result: &LongestPaths) -> Vec<usize> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = result.parent[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Select the critical-path target and rebuild its path.
///
/// Returns `None` when no node is reachable (only possible for an empty
/// result).
#[must_use]
pub fn critical_path(result: &LongestPaths) -> Option<CriticalPath> {
    let mut best: Option<(usize, i64)> = None;
    for (node, &d) in result.dist.iter().enumerate() {
        if !result.reached[node] {
            continue;
        }
        if best.is_none_or(|(_, length)| d > length) {
            best = Some((node, d));
        }
    }

    let (target, length) = best?;
    Some(CriticalPath {
        target,
        length,
        nodes: rebuild_path(target, result),
    })
}

fn check_source(source: usize, nodes: usize) -> Result<(), GraphError> {
    if source < nodes {
        Ok(())
    } else {
        Err(GraphError::SourceOutOfRange {
            vertex: i64::try_from(source).unwrap_or(i64::MAX),
            vertices: nodes,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
