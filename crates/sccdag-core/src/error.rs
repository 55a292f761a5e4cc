use std::fmt;

/// Machine-readable error codes for scripts and downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DatasetParseError,
    ConfigParseError,
    EdgeOutOfRange,
    SourceOutOfRange,
    WeightOutOfRange,
    IoError,
    CycleSurvivedCondensation,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DatasetParseError => "E1001",
            Self::ConfigParseError => "E1002",
            Self::EdgeOutOfRange => "E2001",
            Self::SourceOutOfRange => "E2002",
            Self::WeightOutOfRange => "E2003",
            Self::IoError => "E3001",
            Self::CycleSurvivedCondensation => "E9001",
            Self::InternalUnexpected => "E9002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DatasetParseError => "Dataset parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::EdgeOutOfRange => "Edge references a vertex outside the graph",
            Self::SourceOutOfRange => "Source vertex outside the graph",
            Self::WeightOutOfRange => "Edge weight too large for the graph size",
            Self::IoError => "File system error",
            Self::CycleSurvivedCondensation => "Cycle survived condensation",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::DatasetParseError => {
                Some("Check the dataset is a JSON object with `n` and `edges` fields.")
            }
            Self::ConfigParseError => Some("Fix syntax in sccdag.toml and retry."),
            Self::EdgeOutOfRange => Some("Every edge endpoint must lie in [0, n)."),
            Self::SourceOutOfRange => Some("Pick a source vertex in [0, n)."),
            Self::WeightOutOfRange => {
                Some("Keep every |w| at or below i64::MAX / n so path sums cannot overflow.")
            }
            Self::IoError => Some("Check the path exists and is accessible."),
            Self::CycleSurvivedCondensation | Self::InternalUnexpected => {
                Some("This is a bug in sccdag. Report it with the dataset attached.")
            }
        }
    }

    /// Returns `true` for codes that indicate a defect rather than bad data.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            Self::CycleSurvivedCondensation | Self::InternalUnexpected
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while building a graph or running the pipeline over it.
///
/// Invalid-input variants are reported before any algorithm runs. The
/// internal variant means a stage contract was broken and is never caused by
/// the data alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge number `index` references a vertex outside `[0, vertices)`.
    #[error("edge #{index} ({from} -> {to}) references a vertex outside [0, {vertices})")]
    EdgeOutOfRange {
        index: usize,
        from: i64,
        to: i64,
        vertices: usize,
    },

    /// The requested source vertex is outside `[0, vertices)`.
    #[error("source vertex {vertex} is outside [0, {vertices})")]
    SourceOutOfRange { vertex: i64, vertices: usize },

    /// Edge number `index` has a weight whose magnitude exceeds `limit`.
    #[error("edge #{index} has weight {weight}, outside [-{limit}, {limit}]")]
    WeightOutOfRange { index: usize, weight: i64, limit: i64 },

    /// A topological order came out shorter than the node count.
    #[error("topological order covers {ordered} of {nodes} nodes: a cycle survived condensation")]
    CycleSurvivedCondensation { ordered: usize, nodes: usize },
}

impl GraphError {
    /// The stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::EdgeOutOfRange { .. } => ErrorCode::EdgeOutOfRange,
            Self::SourceOutOfRange { .. } => ErrorCode::SourceOutOfRange,
            Self::WeightOutOfRange { .. } => ErrorCode::WeightOutOfRange,
            Self::CycleSurvivedCondensation { .. } => ErrorCode::CycleSurvivedCondensation,
        }
    }

    /// Returns `true` when the error signals a bug in the pipeline itself.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.error_code().is_internal()
    }

    /// Remediation text suitable for terminal or JSON output.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or_else(|| self.error_code().message())
            .to_string()
    }
}
