//! `sccdag scc`: strongly connected components of one dataset.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sccdag_core::{Adjacency, Metrics, StageMetrics};
use sccdag_graph::{condense, tarjan};

use crate::cmd::{display_name, load_graph};
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render_mode};

/// Arguments for `sccdag scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    /// Dataset JSON file.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ComponentView {
    id: usize,
    size: usize,
    members: Vec<usize>,
}

/// Report payload for `sccdag scc`.
#[derive(Debug, Serialize)]
pub struct SccReport {
    file: String,
    vertices: usize,
    edges: usize,
    scc_count: usize,
    cycle_count: usize,
    condensed_nodes: usize,
    condensed_edges: usize,
    components: Vec<ComponentView>,
}

/// Execute `sccdag scc`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or validated.
pub fn run_scc(args: &SccArgs, output: OutputMode) -> Result<Vec<StageMetrics>> {
    let (_, graph) = load_graph(&args.file)?;

    let mut scc_metrics = Metrics::new();
    let components = tarjan(&graph, &mut scc_metrics);
    let mut condense_metrics = Metrics::new();
    let condensed = condense_metrics.timed(|_| condense(&graph, &components));

    let report = SccReport {
        file: display_name(&args.file),
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        scc_count: components.len(),
        cycle_count: components.cycle_count(),
        condensed_nodes: condensed.node_count(),
        condensed_edges: condensed.edge_count(),
        components: components
            .iter()
            .map(|c| ComponentView {
                id: c.id,
                size: c.members.len(),
                members: c.members.clone(),
            })
            .collect(),
    };

    render_mode(output, &report, render_text, render_pretty)?;

    Ok(vec![
        StageMetrics {
            stage: "scc",
            metrics: scc_metrics,
        },
        StageMetrics {
            stage: "condense",
            metrics: condense_metrics,
        },
    ])
}

fn render_text(report: &SccReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "scc_count: {}", report.scc_count)?;
    for c in &report.components {
        writeln!(w, "component {}: {}", c.id, join_ids(&c.members))?;
    }
    Ok(())
}

fn render_pretty(report: &SccReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Strongly connected components: {}", report.file))?;
    pretty_kv(w, "vertices", report.vertices.to_string())?;
    pretty_kv(w, "edges", report.edges.to_string())?;
    pretty_kv(w, "components", report.scc_count.to_string())?;
    pretty_kv(w, "cycles", report.cycle_count.to_string())?;
    pretty_kv(
        w,
        "condensed",
        format!(
            "{} nodes, {} edges",
            report.condensed_nodes, report.condensed_edges
        ),
    )?;
    writeln!(w)?;
    for c in &report.components {
        writeln!(
            w,
            "  #{:<5} size {:<6} {}",
            c.id,
            c.size,
            join_ids(&c.members)
        )?;
    }
    Ok(())
}
