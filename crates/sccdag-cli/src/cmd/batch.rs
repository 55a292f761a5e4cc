//! `sccdag batch`: run every dataset in a directory and write reports.
//!
//! Two files are written into the directory:
//!
//! - a CSV with one row per dataset under a fixed header: `file` then the
//!   [`RunRecord`] columns;
//! - a JSON document `{"results": [...]}` with the same rows as objects,
//!   plus `weight_model` for datasets that carry one.
//!
//! Datasets are processed in file-name order. A dataset that fails to load
//! or run is logged, listed in the summary and left out of both reports.

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use sccdag_core::metrics::accumulate_stages;
use sccdag_core::{ErrorCode, RECORD_FIELDS, RunRecord, StageMetrics};
use sccdag_graph::run;

use crate::cmd::{display_name, load_graph, pick_source};
use crate::config::BatchConfig;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `sccdag batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory holding `*.json` datasets.
    pub dir: PathBuf,

    /// CSV report file name (overrides config).
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// JSON report file name (overrides config).
    #[arg(long = "json-out")]
    pub json_out: Option<PathBuf>,

    /// Source vertex for datasets without one (overrides config).
    #[arg(long, allow_negative_numbers = true)]
    pub default_source: Option<i64>,
}

/// One dataset's row in both reports.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub file: String,
    #[serde(flatten)]
    pub record: RunRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_model: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultsDocument<'a> {
    results: &'a [BatchRow],
}

#[derive(Debug, Serialize)]
struct SkippedFile {
    file: String,
    error: CliError,
}

/// Summary payload for `sccdag batch`.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    dir: String,
    csv: String,
    json: String,
    processed: usize,
    skipped: Vec<SkippedFile>,
}

/// Execute `sccdag batch`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a report file
/// cannot be written. Individual dataset failures are not errors.
pub fn run_batch(
    args: &BatchArgs,
    config: &BatchConfig,
    output: OutputMode,
) -> Result<Vec<StageMetrics>> {
    let csv_path = args.dir.join(args.csv.as_ref().unwrap_or(&config.csv));
    let json_path = args
        .dir
        .join(args.json_out.as_ref().unwrap_or(&config.json));
    let default_source = args.default_source.unwrap_or(config.default_source);

    let files = dataset_files(&args.dir, &json_path)?;
    info!(dir = %args.dir.display(), datasets = files.len(), "starting batch");

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    let mut totals = Vec::new();

    for path in &files {
        match run_one(path, default_source) {
            Ok((row, stages)) => {
                accumulate_stages(&mut totals, &stages);
                rows.push(row);
            }
            Err(err) => {
                warn!(file = %path.display(), error = %format!("{err:#}"), "skipping dataset");
                skipped.push(SkippedFile {
                    file: display_name(path),
                    error: CliError::from(&err),
                });
            }
        }
    }

    std::fs::write(&csv_path, render_csv(&rows))
        .with_context(|| format!("Failed to write {}", csv_path.display()))
        .context(ErrorCode::IoError)?;
    let document = serde_json::to_string_pretty(&ResultsDocument { results: &rows })?;
    std::fs::write(&json_path, document + "\n")
        .with_context(|| format!("Failed to write {}", json_path.display()))
        .context(ErrorCode::IoError)?;

    info!(
        processed = rows.len(),
        skipped = skipped.len(),
        "batch complete"
    );

    let summary = BatchSummary {
        dir: args.dir.display().to_string(),
        csv: csv_path.display().to_string(),
        json: json_path.display().to_string(),
        processed: rows.len(),
        skipped,
    };
    render_mode(output, &summary, render_text, render_pretty)?;

    Ok(totals)
}

/// `*.json` files directly inside `dir`, sorted by file name, excluding the
/// JSON report itself. The report is matched by canonical path, so a report
/// written elsewhere never hides a dataset with the same file name.
fn dataset_files(dir: &Path, json_report: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))
        .context(ErrorCode::IoError)?;
    let report = std::fs::canonicalize(json_report).ok();

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))
            .context(ErrorCode::IoError)?
            .path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_report = report
            .as_ref()
            .is_some_and(|report| std::fs::canonicalize(&path).is_ok_and(|p| &p == report));
        if is_json && path.is_file() && !is_report {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn run_one(path: &Path, default_source: i64) -> Result<(BatchRow, Vec<StageMetrics>)> {
    let (dataset, graph) = load_graph(path)?;
    let source = pick_source(None, &dataset, default_source);
    let out = run(&graph, source).with_context(|| format!("Failed to run {}", path.display()))?;

    let row = BatchRow {
        file: display_name(path),
        record: out.record,
        weight_model: dataset.weight_model,
    };
    Ok((row, out.stages))
}

/// Render rows as CSV under the fixed `file` + [`RECORD_FIELDS`] header.
pub fn render_csv(rows: &[BatchRow]) -> String {
    let mut header = vec!["file"];
    header.extend(RECORD_FIELDS);

    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        let mut cells = vec![csv_escape(&row.file)];
        cells.extend(row.record.csv_cells());
        let _ = writeln!(out, "{}", cells.join(","));
    }
    out
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_text(summary: &BatchSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "processed: {}", summary.processed)?;
    writeln!(w, "skipped: {}", summary.skipped.len())?;
    writeln!(w, "csv: {}", summary.csv)?;
    writeln!(w, "json: {}", summary.json)?;
    for s in &summary.skipped {
        writeln!(w, "skipped {}: {}", s.file, s.error.message)?;
    }
    Ok(())
}

fn render_pretty(summary: &BatchSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Batch run: {}", summary.dir))?;
    pretty_kv(w, "processed", summary.processed.to_string())?;
    pretty_kv(w, "skipped", summary.skipped.len().to_string())?;
    pretty_kv(w, "csv", &summary.csv)?;
    pretty_kv(w, "json", &summary.json)?;
    if !summary.skipped.is_empty() {
        writeln!(w)?;
        for s in &summary.skipped {
            writeln!(w, "  {}: {}", s.file, s.error.message)?;
        }
    }
    Ok(())
}
