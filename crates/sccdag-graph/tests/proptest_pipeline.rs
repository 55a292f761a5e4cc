use std::collections::BTreeSet;

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use proptest::prelude::*;

use sccdag_core::{Adjacency, Metrics, WeightedAdjacency};
use sccdag_graph::{condense, is_topological_order, kahn, run, tarjan};

#[path = "generators.rs"]
mod generators;
use generators::*;

fn partition_of(members: impl Iterator<Item = Vec<usize>>) -> BTreeSet<Vec<usize>> {
    members
        .map(|mut m| {
            m.sort_unstable();
            m
        })
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    // SCC partition agrees with petgraph's Tarjan.
    #[test]
    fn scc_matches_petgraph(raw in arb_graph(40)) {
        let g = raw.build();
        let mut m = Metrics::new();
        let ours = tarjan(&g, &mut m);
        let theirs = tarjan_scc(&raw.to_petgraph(true));

        let ours = partition_of(ours.iter().map(|c| c.members.clone()));
        let theirs = partition_of(
            theirs.into_iter().map(|c| c.into_iter().map(|n| n.index()).collect()),
        );
        prop_assert_eq!(ours, theirs);
        prop_assert_eq!(m.dfs_ops(), u64::try_from(raw.n).expect("small"));
    }

    #[test]
    fn condensation_is_acyclic(raw in arb_graph(40)) {
        let g = raw.build();
        let components = tarjan(&g, &mut Metrics::new());
        let condensed = condense(&g, &components);

        let mut dag = petgraph::graph::DiGraph::<(), ()>::new();
        let nodes: Vec<_> = (0..condensed.node_count()).map(|_| dag.add_node(())).collect();
        for (a, b, _) in condensed.edges() {
            prop_assert_ne!(a, b);
            dag.add_edge(nodes[a], nodes[b], ());
        }
        prop_assert!(!is_cyclic_directed(&dag));
    }

    #[test]
    fn all_singletons_iff_acyclic_without_self_loops(raw in arb_graph(30)) {
        let g = raw.build();
        let components = tarjan(&g, &mut Metrics::new());
        let acyclic = !is_cyclic_directed(&raw.to_petgraph(false));
        prop_assert_eq!(components.len() == raw.n, acyclic);
    }

    #[test]
    fn order_respects_every_condensed_edge(raw in arb_graph(40)) {
        let out = run(&raw.build(), None).expect("pipeline runs");
        prop_assert!(is_topological_order(&out.condensed, &out.order));
        prop_assert_eq!(out.vertex_order.len(), raw.n);
    }

    #[test]
    fn kahn_orders_any_dag(raw in arb_dag(40)) {
        let g = raw.build();
        let order = kahn(&g, &mut Metrics::new()).expect("generated graph is acyclic");
        prop_assert!(is_topological_order(&g, &order));
    }

    #[test]
    fn shortest_distances_are_tight(raw in arb_graph(30)) {
        let out = run(&raw.build(), None).expect("pipeline runs");
        let cg = &out.condensed;
        let sp = &out.shortest;
        let src = out.source_component.expect("non-empty graph");

        for a in 0..cg.node_count() {
            let Some(da) = sp.distance(a) else { continue };
            for (b, w) in cg.out_edges(a) {
                prop_assert!(sp.dist[b] <= da + w);
            }
        }
        // Every reachable non-source node is achieved through some edge.
        for b in 0..cg.node_count() {
            if b == src || !sp.is_reachable(b) {
                continue;
            }
            let achieved = (0..cg.node_count()).any(|a| {
                sp.distance(a).is_some_and(|da| cg.out_edges(a).any(|(to, w)| to == b && da + w == sp.dist[b]))
            });
            prop_assert!(achieved, "node {} has no tight in-edge", b);
        }
    }

    #[test]
    fn longest_distances_dominate_and_critical_path_sums(raw in arb_graph(30)) {
        let out = run(&raw.build(), None).expect("pipeline runs");
        let cg = &out.condensed;
        let lp = &out.longest;

        for a in 0..cg.node_count() {
            let Some(da) = lp.distance(a) else { continue };
            for (b, w) in cg.out_edges(a) {
                prop_assert!(lp.dist[b] >= da + w);
            }
        }

        let critical = out.critical.as_ref().expect("source is reachable");
        let summed: i64 = critical
            .nodes
            .windows(2)
            .map(|p| cg.weight(p[0], p[1]).expect("path follows condensed edges"))
            .sum();
        prop_assert_eq!(summed, critical.length);
        prop_assert_eq!(critical.length, out.record.longest_max);
        prop_assert_eq!(critical.nodes.first().copied(), out.source_component);
    }

    #[test]
    fn pipeline_is_deterministic(raw in arb_graph(30)) {
        let g = raw.build();
        let a = run(&g, None).expect("pipeline runs");
        let b = run(&g, None).expect("pipeline runs");
        prop_assert_eq!(a.components, b.components);
        prop_assert_eq!(a.order, b.order);
        prop_assert_eq!(a.shortest, b.shortest);
        prop_assert_eq!(a.longest, b.longest);
        prop_assert_eq!(a.critical, b.critical);
    }
}
