use crate::config::{ConfigError, UNIQUE_THRESHOLD};
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort an operation: I/O on the cluster file and caller misuse.
///
/// Lookup misses are not errors of this kind; see [`crate::query::LookupMiss`].
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to open cluster file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read cluster file at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row at line {line}: expected a cutoff and a cluster count")]
    MalformedRow { line: usize },

    #[error("identifier '{0}' has no entry in the translation table")]
    MissingTranslation(String),

    #[error("no '{}' threshold present", UNIQUE_THRESHOLD)]
    MissingUniqueThreshold,

    #[error("minimum threshold {0} must lie within [0, 1]")]
    MinimumOutOfRange(f64),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
