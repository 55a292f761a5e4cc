//! `sccdag dagsp`: shortest and longest paths over the condensation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sccdag_core::StageMetrics;
use sccdag_graph::{CriticalPath, run};

use crate::cmd::{display_name, load_graph, pick_source};
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render_mode};

/// Arguments for `sccdag dagsp`.
#[derive(Args, Debug)]
pub struct DagspArgs {
    /// Dataset JSON file.
    pub file: PathBuf,

    /// Source vertex. Defaults to the dataset's `source`, then the
    /// configured default.
    #[arg(allow_negative_numbers = true)]
    pub source: Option<i64>,
}

/// Distance to one component; `None` when unreachable.
#[derive(Debug, Serialize)]
struct DistanceView {
    component: usize,
    distance: Option<i64>,
}

/// Report payload for `sccdag dagsp`.
#[derive(Debug, Serialize)]
pub struct DagspReport {
    file: String,
    source: Option<usize>,
    source_component: Option<usize>,
    order: Vec<usize>,
    /// Shortest distances, listed in topological order.
    shortest: Vec<DistanceView>,
    /// Longest distances, listed in topological order.
    longest: Vec<DistanceView>,
    critical_path: Option<CriticalPath>,
    longest_max: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_model: Option<String>,
}

/// Execute `sccdag dagsp`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or validated, or if
/// the source vertex is out of range.
pub fn run_dagsp(
    args: &DagspArgs,
    default_source: i64,
    output: OutputMode,
) -> Result<Vec<StageMetrics>> {
    let (dataset, graph) = load_graph(&args.file)?;
    let source = pick_source(args.source, &dataset, default_source);
    let out = run(&graph, source)?;

    let shortest = out
        .order
        .iter()
        .map(|&c| DistanceView {
            component: c,
            distance: out.shortest.distance(c),
        })
        .collect();
    let longest = out
        .order
        .iter()
        .map(|&c| DistanceView {
            component: c,
            distance: out.longest.distance(c),
        })
        .collect();

    let report = DagspReport {
        file: display_name(&args.file),
        source: out.source,
        source_component: out.source_component,
        order: out.order.clone(),
        shortest,
        longest,
        critical_path: out.critical.clone(),
        longest_max: out.longest_max(),
        weight_model: dataset.weight_model,
    };

    render_mode(output, &report, render_text, render_pretty)?;
    Ok(out.stages)
}

fn distance_cell(distance: Option<i64>) -> String {
    distance.map_or_else(|| "unreachable".to_string(), |d| d.to_string())
}

fn render_text(report: &DagspReport, w: &mut dyn Write) -> std::io::Result<()> {
    if let (Some(source), Some(component)) = (report.source, report.source_component) {
        writeln!(w, "source: {source} (component {component})")?;
    }
    for d in &report.shortest {
        writeln!(w, "shortest {}: {}", d.component, distance_cell(d.distance))?;
    }
    for d in &report.longest {
        writeln!(w, "longest {}: {}", d.component, distance_cell(d.distance))?;
    }
    if let Some(cp) = &report.critical_path {
        writeln!(w, "critical_path: {}", join_ids(&cp.nodes))?;
    }
    writeln!(w, "critical_length: {}", report.longest_max)
}

fn render_pretty(report: &DagspReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("DAG paths: {}", report.file))?;
    match (report.source, report.source_component) {
        (Some(source), Some(component)) => {
            pretty_kv(w, "source", format!("vertex {source}, component {component}"))?;
        }
        _ => pretty_kv(w, "source", "none (empty graph)")?,
    }
    if let Some(model) = &report.weight_model {
        pretty_kv(w, "weights", model)?;
    }
    writeln!(w)?;

    writeln!(w, "  {:<10} {:>14} {:>14}", "component", "shortest", "longest")?;
    for (s, l) in report.shortest.iter().zip(&report.longest) {
        writeln!(
            w,
            "  {:<10} {:>14} {:>14}",
            s.component,
            distance_cell(s.distance),
            distance_cell(l.distance)
        )?;
    }
    writeln!(w)?;

    match &report.critical_path {
        Some(cp) => {
            pretty_kv(w, "critical path", join_ids(&cp.nodes))?;
            pretty_kv(w, "length", cp.length.to_string())
        }
        None => pretty_kv(w, "critical path", "none"),
    }
}
