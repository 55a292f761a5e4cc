#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sccdag_core::StageMetrics;
use sccdag_core::metrics::{display_table, timing_enabled_from_env};

use output::{CliError, OutputMode, render_error, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sccdag: strongly connected components, condensation, topological order and DAG paths",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for sccdag (ignored when `SCCDAG_LOG` is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit per-stage timing and counters to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Configuration file (default: `sccdag.toml` in the batch directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "List strongly connected components",
        long_about = "Decompose the dataset graph into strongly connected components and list each component's members.",
        after_help = "EXAMPLES:\n    # Components of one dataset\n    sccdag scc data/tasks.json\n\n    # Emit machine-readable output\n    sccdag scc data/tasks.json --format json"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Topologically order the condensation",
        long_about = "Condense the dataset graph by its components and print a topological order of the components and the derived vertex order.",
        after_help = "EXAMPLES:\n    # Order of one dataset\n    sccdag topo data/tasks.json"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Shortest and longest paths over the condensation",
        long_about = "Run the full pipeline and report single-source shortest and longest distances over the condensation, plus the critical path.",
        after_help = "EXAMPLES:\n    # Use the dataset's source (or vertex 0)\n    sccdag dagsp data/tasks.json\n\n    # Measure from vertex 3\n    sccdag dagsp data/tasks.json 3"
    )]
    Dagsp(cmd::dagsp::DagspArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Run every dataset in a directory",
        long_about = "Run the full pipeline over every *.json dataset in a directory and write CSV and JSON metric reports next to them.",
        after_help = "EXAMPLES:\n    # Write metrics.csv and output.json into data/\n    sccdag batch data\n\n    # Custom report names\n    sccdag batch data --csv runs.csv --json-out runs.json"
    )]
    Batch(cmd::batch::BatchArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    sccdag completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `SCCDAG_LOG` is unset.
const fn default_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "sccdag=debug,info"
    } else {
        "sccdag=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run_command(cli: &Cli, output: OutputMode) -> anyhow::Result<Vec<StageMetrics>> {
    match &cli.command {
        Commands::Scc(args) => cmd::scc::run_scc(args, output),
        Commands::Topo(args) => cmd::topo::run_topo(args, output),
        Commands::Dagsp(args) => {
            let config = config::resolve_config(cli.config.as_deref(), None)?;
            cmd::dagsp::run_dagsp(args, config.batch.default_source, output)
        }
        Commands::Batch(args) => {
            let config = config::resolve_config(cli.config.as_deref(), Some(&args.dir))?;
            cmd::batch::run_batch(args, &config.batch, output)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)?;
            Ok(Vec::new())
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing_enabled_from_env();
    debug!(command = ?cli.command, "dispatching");

    let output = cli.output_mode();

    match run_command(&cli, output) {
        Ok(stages) => {
            if timing_enabled {
                if stages.is_empty() {
                    eprintln!("timing report: no stages recorded");
                } else {
                    eprintln!("timing report:");
                    eprintln!("{}", display_table(&stages));
                    eprintln!("timing report (json):");
                    let json: serde_json::Map<String, serde_json::Value> = stages
                        .iter()
                        .map(|s| (s.stage.to_string(), s.metrics.to_json()))
                        .collect();
                    eprintln!("{}", serde_json::to_string_pretty(&json)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
