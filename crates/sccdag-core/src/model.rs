//! Directed graph model shared by every pipeline stage.
//!
//! # Overview
//!
//! A [`Graph`] is built once from a vertex count and a flat edge list and is
//! immutable afterwards. It keeps two views of the same edges:
//!
//! - the flat [`Edge`] list in input order, and
//! - a per-vertex adjacency list (the order in which edges were supplied for
//!   that source vertex), used by every traversal.
//!
//! ## Weights
//!
//! A supplied weight of `0` means "unspecified" and is stored as
//! [`DEFAULT_WEIGHT`]. Weights are `i64` and bounded by [`weight_limit`]:
//! a simple path has fewer than `n` edges, so no path sum can overflow.
//!
//! ## Traversal traits
//!
//! Stages that only need successor lists take any [`Adjacency`]; stages that
//! need weights take any [`WeightedAdjacency`]. Both the input [`Graph`] and
//! the condensed graphs built downstream implement them, so the scheduler and
//! the path solver run unchanged on either.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::error::GraphError;

/// Weight stored for edges supplied with weight `0`.
pub const DEFAULT_WEIGHT: i64 = 1;

/// Map a supplied weight to the stored weight (`0` becomes [`DEFAULT_WEIGHT`]).
#[must_use]
pub const fn normalize_weight(weight: i64) -> i64 {
    if weight == 0 { DEFAULT_WEIGHT } else { weight }
}

/// Largest weight magnitude accepted for a graph with `vertices` nodes.
#[must_use]
pub fn weight_limit(vertices: usize) -> i64 {
    i64::MAX / i64::try_from(vertices.max(1)).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Traversal traits
// ---------------------------------------------------------------------------

/// Read access to the successor lists of a directed graph with nodes
/// `0..node_count()`.
pub trait Adjacency {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Successors of `node`, in adjacency-list order.
    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_;
}

/// Read access to weighted outgoing edges.
pub trait WeightedAdjacency: Adjacency {
    /// Outgoing `(target, weight)` pairs of `node`, in adjacency-list order.
    fn out_edges(&self, node: usize) -> impl Iterator<Item = (usize, i64)> + '_;
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A validated directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

/// The input graph: `vertices` nodes and a directed, weighted edge list.
///
/// Parallel edges and self-loops are kept as supplied; the condensation stage
/// is responsible for merging and dropping them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, i64)>>,
}

impl Graph {
    /// Build a graph from `(from, to, weight)` triples.
    ///
    /// Endpoints are signed so that negative indices coming from external
    /// input are reported like any other out-of-range index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] for the first edge whose
    /// endpoints are not both in `[0, vertices)`, and
    /// [`GraphError::WeightOutOfRange`] for the first edge whose weight
    /// magnitude exceeds [`weight_limit`].
    pub fn new(
        vertices: usize,
        edges: impl IntoIterator<Item = (i64, i64, i64)>,
    ) -> Result<Self, GraphError> {
        let mut adjacency = vec![Vec::new(); vertices];
        let mut validated = Vec::new();
        let limit = weight_limit(vertices);

        for (index, (from, to, weight)) in edges.into_iter().enumerate() {
            let (Some(u), Some(v)) = (checked_vertex(from, vertices), checked_vertex(to, vertices))
            else {
                return Err(GraphError::EdgeOutOfRange {
                    index,
                    from,
                    to,
                    vertices,
                });
            };
            let weight = normalize_weight(weight);
            if weight.unsigned_abs() > limit.unsigned_abs() {
                return Err(GraphError::WeightOutOfRange {
                    index,
                    weight,
                    limit,
                });
            }
            adjacency[u].push((v, weight));
            validated.push(Edge {
                from: u,
                to: v,
                weight,
            });
        }

        Ok(Self {
            edges: validated,
            adjacency,
        })
    }

    /// Build a graph with every edge at [`DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Same as [`Graph::new`].
    pub fn unweighted(
        vertices: usize,
        edges: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self, GraphError> {
        Self::new(
            vertices,
            edges
                .into_iter()
                .map(|(from, to)| (from, to, DEFAULT_WEIGHT)),
        )
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges as supplied (parallel edges and self-loops included).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Check that `vertex` can be used as a path source.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SourceOutOfRange`] if `vertex` is not in
    /// `[0, vertex_count())`.
    pub fn check_source(&self, vertex: i64) -> Result<usize, GraphError> {
        checked_vertex(vertex, self.vertex_count()).ok_or(GraphError::SourceOutOfRange {
            vertex,
            vertices: self.vertex_count(),
        })
    }
}

impl Adjacency for Graph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().map(|&(to, _)| to)
    }
}

impl WeightedAdjacency for Graph {
    fn out_edges(&self, node: usize) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.adjacency[node].iter().copied()
    }
}

fn checked_vertex(vertex: i64, vertices: usize) -> Option<usize> {
    usize::try_from(vertex).ok().filter(|&v| v < vertices)
}

// ---------------------------------------------------------------------------
// Digraph
// ---------------------------------------------------------------------------

/// A plain unweighted directed graph given by its successor lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Digraph {
    adjacency: Vec<Vec<usize>>,
}

impl Digraph {
    /// Wrap successor lists. Every target must be below `adjacency.len()`;
    /// the stages that build a `Digraph` guarantee this by construction.
    #[must_use]
    pub const fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Self {
        Self { adjacency }
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

impl Adjacency for Digraph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weight_is_stored_as_default() {
        let g = Graph::new(2, [(0, 1, 0)]).expect("valid graph");
        assert_eq!(g.edges()[0].weight, DEFAULT_WEIGHT);
        assert_eq!(g.out_edges(0).collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn non_zero_weights_are_kept_including_negative() {
        let g = Graph::new(3, [(0, 1, 7), (1, 2, -3)]).expect("valid graph");
        let weights: Vec<i64> = g.edges().iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![7, -3]);
    }

    #[test]
    fn adjacency_keeps_input_order_per_vertex() {
        let g = Graph::unweighted(4, [(0, 3), (1, 2), (0, 1), (0, 2)]).expect("valid graph");
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(g.successors(1).collect::<Vec<_>>(), vec![2]);
        assert_eq!(g.successors(3).count(), 0);
    }

    #[test]
    fn parallel_edges_and_self_loops_are_kept() {
        let g = Graph::new(2, [(0, 1, 4), (0, 1, 2), (1, 1, 1)]).expect("valid graph");
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.successors(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn out_of_range_edge_is_rejected_with_its_index() {
        let err = Graph::unweighted(3, [(0, 1), (1, 3)]).expect_err("edge 1 is out of range");
        assert_eq!(
            err,
            GraphError::EdgeOutOfRange {
                index: 1,
                from: 1,
                to: 3,
                vertices: 3,
            }
        );
    }

    #[test]
    fn negative_endpoint_is_rejected() {
        let err = Graph::unweighted(3, [(-1, 0)]).expect_err("negative endpoint");
        assert!(matches!(err, GraphError::EdgeOutOfRange { index: 0, .. }));
    }

    #[test]
    fn empty_graph_has_no_vertices_or_edges() {
        let g = Graph::unweighted(0, []).expect("empty graph is valid");
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn any_edge_into_an_empty_graph_is_rejected() {
        assert!(Graph::unweighted(0, [(0, 0)]).is_err());
    }

    #[test]
    fn check_source_bounds() {
        let g = Graph::unweighted(3, [(0, 1)]).expect("valid graph");
        assert_eq!(g.check_source(2), Ok(2));
        assert_eq!(
            g.check_source(3),
            Err(GraphError::SourceOutOfRange {
                vertex: 3,
                vertices: 3
            })
        );
        assert!(g.check_source(-4).is_err());
    }

    #[test]
    fn weights_beyond_the_limit_are_rejected() {
        let limit = weight_limit(4);
        assert_eq!(limit, i64::MAX / 4);
        assert!(Graph::new(4, [(0, 1, limit), (1, 2, -limit)]).is_ok());

        let err = Graph::new(4, [(0, 1, 1), (1, 2, limit + 1)]).expect_err("too heavy");
        assert_eq!(
            err,
            GraphError::WeightOutOfRange {
                index: 1,
                weight: limit + 1,
                limit,
            }
        );
        assert!(!err.is_internal());
        assert!(Graph::new(1, [(0, 0, i64::MIN)]).is_err());
    }

    #[test]
    fn weight_limit_keeps_any_simple_path_in_range() {
        for n in [0_usize, 1, 2, 3, 1000] {
            let limit = i128::from(weight_limit(n));
            let edges = i128::try_from(n.saturating_sub(1)).expect("small n");
            assert!(limit * edges <= i128::from(i64::MAX));
        }
        assert_eq!(weight_limit(0), i64::MAX);
    }

    #[test]
    fn digraph_counts_edges() {
        let d = Digraph::from_adjacency(vec![vec![1, 2], vec![2], vec![]]);
        assert_eq!(d.node_count(), 3);
        assert_eq!(d.edge_count(), 3);
        assert_eq!(d.successors(0).collect::<Vec<_>>(), vec![1, 2]);
    }
}
