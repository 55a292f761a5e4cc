pub mod batch;
pub mod completions;
pub mod dagsp;
pub mod scc;
pub mod topo;

use std::path::Path;

use anyhow::{Context, Result};

use sccdag_core::{Dataset, ErrorCode, Graph};

/// Load a dataset file and validate it into a [`Graph`].
///
/// Read and parse failures are tagged [`ErrorCode::DatasetParseError`];
/// out-of-range edges surface as the underlying `GraphError`.
pub fn load_graph(path: &Path) -> Result<(Dataset, Graph)> {
    let dataset = Dataset::load(path).context(ErrorCode::DatasetParseError)?;
    let graph = dataset
        .to_graph()
        .with_context(|| format!("Invalid dataset {}", path.display()))?;
    Ok((dataset, graph))
}

/// Pick the path source: an explicit choice, then the dataset's own
/// `source`, then `default`. An empty dataset with nothing explicit gets
/// no source at all.
pub const fn pick_source(explicit: Option<i64>, dataset: &Dataset, default: i64) -> Option<i64> {
    match (explicit, dataset.source) {
        (Some(source), _) | (None, Some(source)) => Some(source),
        (None, None) if dataset.n == 0 => None,
        (None, None) => Some(default),
    }
}

/// File name of `path` for reports, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize, source: Option<i64>) -> Dataset {
        Dataset {
            directed: true,
            n,
            edges: Vec::new(),
            source,
            weight_model: None,
        }
    }

    #[test]
    fn explicit_source_wins() {
        assert_eq!(pick_source(Some(2), &dataset(3, Some(1)), 0), Some(2));
    }

    #[test]
    fn dataset_source_beats_default() {
        assert_eq!(pick_source(None, &dataset(3, Some(1)), 0), Some(1));
        assert_eq!(pick_source(None, &dataset(3, None), 2), Some(2));
    }

    #[test]
    fn empty_dataset_without_source_has_none() {
        assert_eq!(pick_source(None, &dataset(0, None), 0), None);
    }

    #[test]
    fn display_name_is_the_file_name() {
        assert_eq!(display_name(Path::new("/data/a.json")), "a.json");
    }
}
