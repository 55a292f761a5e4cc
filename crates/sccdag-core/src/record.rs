//! The per-run metric record consumed by downstream tooling.
//!
//! Field names and their order are a stable contract: the JSON serializer
//! emits fields in declaration order and the CSV header is
//! [`RECORD_FIELDS`]. Do not reorder.

use serde::Serialize;

use crate::metrics::Metrics;

/// Column names, in output order.
pub const RECORD_FIELDS: [&str; 12] = [
    "vertices",
    "edges",
    "scc_count",
    "scc_time",
    "scc_visits",
    "topo_time",
    "topo_ops",
    "shortest_time",
    "shortest_relax_ops",
    "longest_time",
    "longest_relax_ops",
    "longest_max",
];

/// Summary of one pipeline run. Times are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub vertices: usize,
    pub edges: usize,
    pub scc_count: usize,
    pub scc_time: f64,
    pub scc_visits: u64,
    pub topo_time: f64,
    pub topo_ops: u64,
    pub shortest_time: f64,
    pub shortest_relax_ops: u64,
    pub longest_time: f64,
    pub longest_relax_ops: u64,
    pub longest_max: i64,
}

/// Inputs to [`RunRecord::from_stages`], grouped to keep the call readable.
#[derive(Debug, Clone, Copy)]
pub struct StageInputs<'a> {
    pub vertices: usize,
    pub edges: usize,
    pub scc_count: usize,
    pub longest_max: i64,
    pub scc: &'a Metrics,
    pub topo: &'a Metrics,
    pub shortest: &'a Metrics,
    pub longest: &'a Metrics,
}

impl RunRecord {
    #[must_use]
    pub fn from_stages(inputs: StageInputs<'_>) -> Self {
        Self {
            vertices: inputs.vertices,
            edges: inputs.edges,
            scc_count: inputs.scc_count,
            scc_time: inputs.scc.elapsed_ms(),
            scc_visits: inputs.scc.dfs_ops(),
            topo_time: inputs.topo.elapsed_ms(),
            topo_ops: inputs.topo.topo_ops(),
            shortest_time: inputs.shortest.elapsed_ms(),
            shortest_relax_ops: inputs.shortest.relax_ops(),
            longest_time: inputs.longest.elapsed_ms(),
            longest_relax_ops: inputs.longest.relax_ops(),
            longest_max: inputs.longest_max,
        }
    }

    /// The record's values as CSV cells, in [`RECORD_FIELDS`] order.
    #[must_use]
    pub fn csv_cells(&self) -> [String; 12] {
        [
            self.vertices.to_string(),
            self.edges.to_string(),
            self.scc_count.to_string(),
            self.scc_time.to_string(),
            self.scc_visits.to_string(),
            self.topo_time.to_string(),
            self.topo_ops.to_string(),
            self.shortest_time.to_string(),
            self.shortest_relax_ops.to_string(),
            self.longest_time.to_string(),
            self.longest_relax_ops.to_string(),
            self.longest_max.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunRecord {
        RunRecord {
            vertices: 5,
            edges: 5,
            scc_count: 3,
            scc_time: 0.5,
            scc_visits: 5,
            topo_time: 0.25,
            topo_ops: 6,
            shortest_time: 0.125,
            shortest_relax_ops: 2,
            longest_time: 0.0625,
            longest_relax_ops: 2,
            longest_max: 3,
        }
    }

    #[test]
    fn json_field_order_matches_contract() {
        let json = serde_json::to_string(&sample()).expect("record serializes");
        let mut last = 0;
        for field in RECORD_FIELDS {
            let needle = format!("\"{field}\":");
            let pos = json
                .find(&needle)
                .unwrap_or_else(|| panic!("{field} missing from {json}"));
            assert!(pos >= last, "{field} out of order in {json}");
            last = pos;
        }
    }

    #[test]
    fn csv_cells_follow_field_order() {
        let cells = sample().csv_cells();
        assert_eq!(cells[0], "5");
        assert_eq!(cells[2], "3");
        assert_eq!(cells[3], "0.5");
        assert_eq!(cells[6], "6");
        assert_eq!(cells[11], "3");
    }

    #[test]
    fn from_stages_copies_counters() {
        let mut scc = Metrics::new();
        scc.inc_dfs();
        scc.inc_dfs();
        let mut topo = Metrics::new();
        topo.inc_topo();
        let mut shortest = Metrics::new();
        shortest.inc_relax();
        let longest = Metrics::new();

        let record = RunRecord::from_stages(StageInputs {
            vertices: 2,
            edges: 1,
            scc_count: 2,
            longest_max: 1,
            scc: &scc,
            topo: &topo,
            shortest: &shortest,
            longest: &longest,
        });

        assert_eq!(record.scc_visits, 2);
        assert_eq!(record.topo_ops, 1);
        assert_eq!(record.shortest_relax_ops, 1);
        assert_eq!(record.longest_relax_ops, 0);
        assert_eq!(record.longest_max, 1);
    }
}
