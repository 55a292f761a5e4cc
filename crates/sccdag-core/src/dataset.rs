//! JSON dataset loading.
//!
//! A dataset describes one input graph:
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 5,
//!   "edges": [{"u": 0, "v": 1, "w": 3}, {"u": 1, "v": 2}],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! `w` may be omitted or `0`; either way the edge is stored with weight `1`.
//! `weight_model` is carried through to reports and never interpreted.
//! Index validation happens in [`Dataset::to_graph`], so a dataset that
//! parses can still be rejected as invalid input.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GraphError;
use crate::model::Graph;

/// One edge as it appears in a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: i64,
    pub v: i64,
    #[serde(default)]
    pub w: i64,
}

/// A parsed, not yet validated, graph description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default = "default_true")]
    pub directed: bool,
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub source: Option<i64>,
    #[serde(default)]
    pub weight_model: Option<String>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid dataset object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse dataset JSON")
    }

    /// Read and parse a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error naming `path` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let dataset: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(
            path = %path.display(),
            vertices = dataset.n,
            edges = dataset.edges.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Validate the edge list and build the [`Graph`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] if any edge endpoint is
    /// negative or not below `n`.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        Graph::new(self.n, self.edges.iter().map(|e| (e.u, e.v, e.w)))
    }
}

const fn default_true() -> bool {
    true
}
