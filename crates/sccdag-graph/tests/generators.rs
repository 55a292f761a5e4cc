#![allow(dead_code)]

use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;
use sccdag_core::Graph;

/// Raw input for [`Graph::new`]: a vertex count and `(u, v, w)` triples.
#[derive(Debug, Clone)]
pub struct RawGraph {
    pub n: usize,
    pub edges: Vec<(i64, i64, i64)>,
}

impl RawGraph {
    pub fn build(&self) -> Graph {
        Graph::new(self.n, self.edges.iter().copied()).expect("generated edges are in range")
    }

    /// The same graph as a petgraph `DiGraph`, optionally without
    /// self-loops.
    pub fn to_petgraph(&self, keep_self_loops: bool) -> DiGraph<(), ()> {
        let mut g = DiGraph::with_capacity(self.n, self.edges.len());
        for _ in 0..self.n {
            g.add_node(());
        }
        for &(u, v, _) in &self.edges {
            if u == v && !keep_self_loops {
                continue;
            }
            g.add_edge(node(u), node(v), ());
        }
        g
    }
}

fn node(v: i64) -> NodeIndex {
    NodeIndex::new(usize::try_from(v).expect("generated vertex is non-negative"))
}

/// Graphs with 1..=max_n vertices and up to three edges per vertex.
///
/// Weights include negatives and zero.
pub fn arb_graph(max_n: usize) -> impl Strategy<Value = RawGraph> {
    (1..=max_n).prop_flat_map(|n| {
        let hi = i64::try_from(n).expect("small vertex count");
        prop::collection::vec((0..hi, 0..hi, -5_i64..10), 0..=n * 3)
            .prop_map(move |edges| RawGraph { n, edges })
    })
}

/// Acyclic graphs: every edge goes from a lower to a higher vertex id.
pub fn arb_dag(max_n: usize) -> impl Strategy<Value = RawGraph> {
    arb_graph(max_n).prop_map(|raw| RawGraph {
        n: raw.n,
        edges: raw
            .edges
            .into_iter()
            .filter(|&(u, v, _)| u != v)
            .map(|(u, v, w)| (u.min(v), u.max(v), w))
            .collect(),
    })
}
