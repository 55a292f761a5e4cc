//! `sccdag topo`: topological order of the condensation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sccdag_core::{Metrics, StageMetrics};
use sccdag_graph::{condense_membership, kahn, tarjan};

use crate::cmd::{display_name, load_graph};
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render_mode};

/// Arguments for `sccdag topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Dataset JSON file.
    pub file: PathBuf,
}

/// Report payload for `sccdag topo`.
#[derive(Debug, Serialize)]
pub struct TopoReport {
    file: String,
    scc_count: usize,
    /// Component ids in topological order.
    order: Vec<usize>,
    /// Vertices, component by component in `order`.
    vertex_order: Vec<usize>,
    topo_ops: u64,
}

/// Execute `sccdag topo`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or validated, or if the
/// condensation turns out cyclic.
pub fn run_topo(args: &TopoArgs, output: OutputMode) -> Result<Vec<StageMetrics>> {
    let (_, graph) = load_graph(&args.file)?;

    let mut scc_metrics = Metrics::new();
    let components = tarjan(&graph, &mut scc_metrics);
    let mut condense_metrics = Metrics::new();
    let membership = condense_metrics.timed(|_| condense_membership(&graph, &components));
    let mut topo_metrics = Metrics::new();
    let order = kahn(&membership, &mut topo_metrics)?;

    let report = TopoReport {
        file: display_name(&args.file),
        scc_count: components.len(),
        vertex_order: components.expand_order(&order),
        order,
        topo_ops: topo_metrics.topo_ops(),
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
        StageMetrics {
            stage: "topo",
            metrics: topo_metrics,
        },
    ])
}

fn render_text(report: &TopoReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "order: {}", join_ids(&report.order))?;
    writeln!(w, "vertex_order: {}", join_ids(&report.vertex_order))
}

fn render_pretty(report: &TopoReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Topological order: {}", report.file))?;
    pretty_kv(w, "components", report.scc_count.to_string())?;
    pretty_kv(w, "order", join_ids(&report.order))?;
    pretty_kv(w, "vertices", join_ids(&report.vertex_order))?;
    pretty_kv(w, "topo ops", report.topo_ops.to_string())
}
