//! Optional `sccdag.toml` configuration.
//!
//! ```toml
//! [batch]
//! csv = "metrics.csv"
//! json = "output.json"
//! default_source = 0
//! ```
//!
//! Every field has a default, so an empty or missing file is valid.
//! Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sccdag_core::ErrorCode;

/// File name looked up next to the datasets when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "sccdag.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Metrics CSV file name, relative to the batch directory.
    #[serde(default = "default_csv")]
    pub csv: PathBuf,
    /// Results JSON file name, relative to the batch directory.
    #[serde(default = "default_json")]
    pub json: PathBuf,
    /// Source vertex for datasets that do not name one.
    #[serde(default)]
    pub default_source: i64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            csv: default_csv(),
            json: default_json(),
            default_source: 0,
        }
    }
}

/// Load configuration from `path`.
///
/// # Errors
///
/// Returns an error tagged [`ErrorCode::ConfigParseError`] if the file
/// cannot be read or is not valid TOML for [`Config`].
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .context(ErrorCode::ConfigParseError)?;

    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
        .context(ErrorCode::ConfigParseError)?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Otherwise `sccdag.toml` in `search_dir` is
/// used when present, and defaults when not.
///
/// # Errors
///
/// Propagates [`load_config`] failures.
pub fn resolve_config(explicit: Option<&Path>, search_dir: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match search_dir.map(|dir| dir.join(CONFIG_FILE_NAME)) {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(Config::default()),
    }
}

fn default_csv() -> PathBuf {
    PathBuf::from("metrics.csv")
}

fn default_json() -> PathBuf {
    PathBuf::from("output.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CliError;

    #[test]
    fn missing_file_in_search_dir_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = resolve_config(None, Some(dir.path())).expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.batch.csv, PathBuf::from("metrics.csv"));
        assert_eq!(config.batch.json, PathBuf::from("output.json"));
        assert_eq!(config.batch.default_source, 0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[batch]\ncsv = \"runs.csv\"\n",
        )
        .expect("write config");

        let config = resolve_config(None, Some(dir.path())).expect("parses");
        assert_eq!(config.batch.csv, PathBuf::from("runs.csv"));
        assert_eq!(config.batch.json, PathBuf::from("output.json"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = resolve_config(Some(&missing), None).expect_err("missing file");
        assert_eq!(CliError::from(&err).error_code.as_deref(), Some("E1002"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[batch\ncsv = ").expect("write config");

        let err = load_config(&path).expect_err("invalid toml");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1002"));
        assert!(cli.message.contains("Failed to parse"));
    }
}
