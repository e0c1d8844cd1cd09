//! Error types for pinsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from config document operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (read or rewrite of the document).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config document did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// The document is neither a component list nor a `components` wrapper.
    #[error("config at {path} is not a component list or a mapping with a `components` list")]
    Shape { path: PathBuf },
}
