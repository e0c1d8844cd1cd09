//! Error types for pinsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use pinsync_core::ConfigError;

/// All errors that can arise from a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the config document layer.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The cloned snapshot directory does not exist.
    #[error("snapshot directory missing at {path}")]
    SnapshotMissing { path: PathBuf },

    /// The snapshot holds no manifest file.
    #[error("no manifest found at {path}")]
    ManifestMissing { path: PathBuf },

    /// Manifest JSON failed to parse.
    #[error("failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `git clone` or `git checkout` failed.
    #[error("failed to clone {org}/{repo}@{branch}: {detail}")]
    Clone {
        org: String,
        repo: String,
        branch: String,
        detail: String,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
