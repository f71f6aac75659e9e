use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, validating or rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The result table does not match the declared labels
    #[error("{what}: expected {expected} entries, found {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("palette has {colors} colors but {configs} configurations need one each")]
    PaletteTooSmall { colors: usize, configs: usize },

    #[error("invalid result for configuration '{config}', benchmark '{benchmark}': {value}")]
    InvalidValue {
        config: String,
        benchmark: String,
        value: f64,
    },

    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("PDF conversion failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
