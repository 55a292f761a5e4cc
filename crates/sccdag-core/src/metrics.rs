//! Per-stage timing and operation counters.
//!
//! Every stage takes a `&mut Metrics` and hands it back as part of its
//! output, so each run owns its own counters and concurrent runs never share
//! state. A stage calls [`Metrics::start`] on entry and [`Metrics::stop`] on
//! exit; the counters it bumps in between are part of the observable
//! contract:
//!
//! | counter     | bumped by                                   |
//! |-------------|---------------------------------------------|
//! | `dfs_ops`   | each vertex discovery during SCC search     |
//! | `topo_ops`  | each enqueue and each dequeue in Kahn's sort |
//! | `relax_ops` | each successful distance relaxation         |

use std::time::{Duration, Instant};

use serde_json::json;

/// Timer plus operation counters for one stage invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    started: Option<Instant>,
    elapsed: Duration,
    dfs_ops: u64,
    topo_ops: u64,
    relax_ops: u64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop the timer and store the elapsed time since the last
    /// [`start`](Self::start). Stopping a timer that was never started
    /// leaves the elapsed time untouched.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Run `f` between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn timed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.start();
        let result = f(self);
        self.stop();
        result
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    pub const fn inc_dfs(&mut self) {
        self.dfs_ops += 1;
    }

    pub const fn inc_topo(&mut self) {
        self.topo_ops += 1;
    }

    pub const fn inc_relax(&mut self) {
        self.relax_ops += 1;
    }

    #[must_use]
    pub const fn dfs_ops(&self) -> u64 {
        self.dfs_ops
    }

    #[must_use]
    pub const fn topo_ops(&self) -> u64 {
        self.topo_ops
    }

    #[must_use]
    pub const fn relax_ops(&self) -> u64 {
        self.relax_ops
    }

    /// Add `other`'s elapsed time and counters to this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.elapsed += other.elapsed;
        self.dfs_ops += other.dfs_ops;
        self.topo_ops += other.topo_ops;
        self.relax_ops += other.relax_ops;
    }

    /// Render the counters as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "time_ms": self.elapsed_ms(),
            "dfs_ops": self.dfs_ops,
            "topo_ops": self.topo_ops,
            "relax_ops": self.relax_ops,
        })
    }
}

// ---------------------------------------------------------------------------
// Stage table
// ---------------------------------------------------------------------------

/// A named stage and the metrics it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMetrics {
    pub stage: &'static str,
    pub metrics: Metrics,
}

/// Fold one run's stages into `totals`, matching stages by name.
///
/// Stages not yet in `totals` are appended in the order they first appear.
pub fn accumulate_stages(totals: &mut Vec<StageMetrics>, run: &[StageMetrics]) {
    for stage in run {
        match totals.iter_mut().find(|t| t.stage == stage.stage) {
            Some(total) => total.metrics.accumulate(&stage.metrics),
            None => totals.push(stage.clone()),
        }
    }
}

/// Render stage metrics as a simple table for terminal output.
#[must_use]
pub fn display_table(stages: &[StageMetrics]) -> String {
    if stages.is_empty() {
        return "No stages recorded.".to_string();
    }

    let mut out = String::new();
    out.push_str("stage           time      dfs_ops   topo_ops  relax_ops\n");
    out.push_str("--------------------------------------------------------\n");

    for stage in stages {
        out.push_str(&format!(
            "{:<12} {:>8} {:>10} {:>10} {:>10}\n",
            stage.stage,
            format_duration(stage.metrics.elapsed()),
            stage.metrics.dfs_ops(),
            stage.metrics.topo_ops(),
            stage.metrics.relax_ops(),
        ));
    }

    out
}

/// Returns true when `SCCDAG_TIMING` asks for the stage table.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("SCCDAG_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("1")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
}
