//! Build manifest fetch and parse.
//!
//! The pipeline snapshot publishes one JSON array at a fixed well-known
//! filename; each element names a built image and the commit hash the build
//! actually used.

use std::path::Path;

use serde::Deserialize;

use crate::error::{io_err, SyncError};

/// Well-known manifest filename at the snapshot root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One built component as recorded in the pipeline manifest.
///
/// Both fields are optional at parse time: an entry missing either is
/// unmatchable and never pairs with a tracked component. Unknown fields are
/// ignored. Read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    #[serde(default, rename = "image-name")]
    pub image_name: Option<String>,
    #[serde(default, rename = "git-sha256")]
    pub git_sha256: Option<String>,
}

impl ManifestEntry {
    /// The built hash, when this entry names `component` and carries one.
    pub fn built_sha_for(&self, component: &str) -> Option<&str> {
        match (self.image_name.as_deref(), self.git_sha256.as_deref()) {
            (Some(image), Some(sha)) if image == component => Some(sha),
            _ => None,
        }
    }
}

/// Locate and parse the latest manifest in a cloned snapshot directory.
///
/// Returns the entries in manifest order (ordering is authoritative for
/// duplicate names). An empty array is a valid parse and simply yields no
/// matches downstream. Errors:
/// - snapshot directory absent → [`SyncError::SnapshotMissing`]
/// - manifest file absent → [`SyncError::ManifestMissing`]
/// - malformed JSON → [`SyncError::ManifestParse`]
pub fn fetch_latest(dir: &Path) -> Result<Vec<ManifestEntry>, SyncError> {
    if !dir.is_dir() {
        return Err(SyncError::SnapshotMissing { path: dir.to_path_buf() });
    }
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Err(SyncError::ManifestMissing { path });
    }

    tracing::info!("reading manifest data from {}", path.display());
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&contents).map_err(|e| SyncError::ManifestParse { path, source: e })?;
    tracing::debug!("manifest holds {} entries", entries.len());
    Ok(entries)
}
