//! Condensation of a graph by its strongly connected components.
//!
//! # Overview
//!
//! Each component becomes one node. An original edge `(u, v, w)` maps to
//! `(comp(u), comp(v), w)`:
//!
//! - edges with `comp(u) == comp(v)` (self-loops and intra-cycle edges) are
//!   dropped;
//! - parallel edges between the same ordered pair of components are merged
//!   into one, keeping the **minimum** weight.
//!
//! The result is acyclic whenever the component list is a correct SCC
//! partition: a cycle between components would have merged them.
//!
//! # Edge order
//!
//! Original vertices are scanned in ascending id and each vertex's edges in
//! adjacency order. A condensed edge is placed in its source node's list the
//! first time its pair is seen; later parallel edges only lower its weight.
//! [`condense`] and [`condense_membership`] therefore produce the same
//! successor order.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use sccdag_core::{Adjacency, Digraph, WeightedAdjacency};

use crate::scc::Components;

// ---------------------------------------------------------------------------
// CondensedGraph
// ---------------------------------------------------------------------------

/// Weighted acyclic graph with one node per component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CondensedGraph {
    adjacency: Vec<Vec<(usize, i64)>>,
}

impl CondensedGraph {
    /// Number of condensed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Weight of the edge `a -> b`, if present.
    #[must_use]
    pub fn weight(&self, a: usize, b: usize) -> Option<i64> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|&&(to, _)| to == b)
            .map(|&(_, w)| w)
    }

    /// All edges as `(a, b, w)`, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, out)| out.iter().map(move |&(b, w)| (a, b, w)))
    }

    /// Drop the weights.
    #[must_use]
    pub fn to_digraph(&self) -> Digraph {
        Digraph::from_adjacency(
            self.adjacency
                .iter()
                .map(|out| out.iter().map(|&(b, _)| b).collect())
                .collect(),
        )
    }
}

impl Adjacency for CondensedGraph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().map(|&(to, _)| to)
    }
}

impl WeightedAdjacency for CondensedGraph {
    fn out_edges(&self, node: usize) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.adjacency[node].iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// Build the weighted condensation of `graph` by `components`.
///
/// # Panics
///
/// Panics if `components` does not cover every vertex of `graph`.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.node_count(), components = components.len()))]
pub fn condense(graph: &impl WeightedAdjacency, components: &Components) -> CondensedGraph {
    let comp = components.lookup();
    let mut adjacency: Vec<Vec<(usize, i64)>> = vec![Vec::new(); components.len()];
    // (a, b) -> slot of the edge in adjacency[a]
    let mut slot: HashMap<(usize, usize), usize> = HashMap::new();

    for u in 0..graph.node_count() {
        let a = comp[u];
        for (v, w) in graph.out_edges(u) {
            let b = comp[v];
            if a == b {
                continue;
            }
            match slot.get(&(a, b)) {
                Some(&i) => {
                    let merged = &mut adjacency[a][i].1;
                    *merged = (*merged).min(w);
                }
                None => {
                    slot.insert((a, b), adjacency[a].len());
                    adjacency[a].push((b, w));
                }
            }
        }
    }

    let condensed = CondensedGraph { adjacency };
    debug!(
        nodes = condensed.node_count(),
        edges = condensed.edge_count(),
        "weighted condensation built"
    );
    condensed
}

/// Build the unweighted condensation: one edge per distinct ordered pair of
/// components, in the same order as [`condense`].
///
/// # Panics
///
/// Panics if `components` does not cover every vertex of `graph`.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.node_count(), components = components.len()))]
pub fn condense_membership(graph: &impl Adjacency, components: &Components) -> Digraph {
    let comp = components.lookup();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); components.len()];
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for u in 0..graph.node_count() {
        let a = comp[u];
        for v in graph.successors(u) {
            let b = comp[v];
            if a != b && seen.insert((a, b)) {
                adjacency[a].push(b);
            }
        }
    }

    let membership = Digraph::from_adjacency(adjacency);
    debug!(
        nodes = membership.node_count(),
        edges = membership.edge_count(),
        "membership condensation built"
    );
    membership
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc::tarjan;
    use sccdag_core::{Graph, Metrics};

    fn condensed_of(graph: &Graph) -> (Components, CondensedGraph) {
        let components = tarjan(graph, &mut Metrics::new());
        let condensed = condense(graph, &components);
        (components, condensed)
    }

    #[test]
    fn cycle_with_tail_condenses_to_chain() {
        let g = Graph::new(5, [(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 2), (3, 4, 1)])
            .expect("valid graph");
        let (c, cg) = condensed_of(&g);

        assert_eq!(cg.node_count(), 3);
        assert_eq!(cg.edge_count(), 2);
        let cycle = c.component_of(0);
        let three = c.component_of(3);
        let four = c.component_of(4);
        assert_eq!(cg.weight(cycle, three), Some(2));
        assert_eq!(cg.weight(three, four), Some(1));
        assert_eq!(cg.weight(cycle, four), None);
    }

    #[test]
    fn parallel_edges_keep_minimum_weight() {
        // Three routes from {0,1} into {2}: weights 5, 3, 9.
        let g = Graph::new(3, [(0, 1, 1), (1, 0, 1), (0, 2, 5), (1, 2, 3), (0, 2, 9)])
            .expect("valid graph");
        let (c, cg) = condensed_of(&g);
        assert_eq!(cg.edge_count(), 1);
        assert_eq!(cg.weight(c.component_of(0), c.component_of(2)), Some(3));
    }

    #[test]
    fn minimum_not_sum_and_not_first() {
        let g = Graph::new(2, [(0, 1, 4), (0, 1, 2), (0, 1, 7)]).expect("valid graph");
        let (c, cg) = condensed_of(&g);
        assert_eq!(cg.weight(c.component_of(0), c.component_of(1)), Some(2));
    }

    #[test]
    fn self_loops_and_intra_component_edges_are_dropped() {
        let g = Graph::unweighted(3, [(0, 0), (1, 2), (2, 1), (1, 1)]).expect("valid graph");
        let (_, cg) = condensed_of(&g);
        assert_eq!(cg.edge_count(), 0);
        assert!(cg.edges().all(|(a, b, _)| a != b));
    }

    #[test]
    fn single_scc_condenses_to_one_isolated_node() {
        let g = Graph::unweighted(4, [(0, 1), (1, 2), (2, 3), (3, 0), (2, 0)])
            .expect("valid graph");
        let (_, cg) = condensed_of(&g);
        assert_eq!(cg.node_count(), 1);
        assert_eq!(cg.edge_count(), 0);
    }

    #[test]
    fn membership_condensation_matches_weighted_order() {
        let g = Graph::new(
            6,
            [(0, 3, 2), (0, 1, 1), (1, 0, 1), (1, 4, 6), (0, 3, 1), (2, 5, 1)],
        )
        .expect("valid graph");
        let components = tarjan(&g, &mut Metrics::new());
        let weighted = condense(&g, &components);
        let membership = condense_membership(&g, &components);

        assert_eq!(weighted.to_digraph(), membership);
        assert_eq!(membership.edge_count(), 3);
    }

    #[test]
    fn empty_graph_condenses_to_empty_graph() {
        let g = Graph::unweighted(0, []).expect("valid graph");
        let (_, cg) = condensed_of(&g);
        assert_eq!(cg.node_count(), 0);
        assert_eq!(cg.edges().count(), 0);
    }
}
