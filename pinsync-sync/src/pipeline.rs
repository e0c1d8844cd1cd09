//! Canonical run entrypoint used by the CLI.

use std::path::PathBuf;

use pinsync_core::{ComponentName, ConfigDocument};

use crate::manifest;
use crate::reconcile::{self, Decision};
use crate::repo::{clone_snapshot, CloneRequest, Workdir};
use crate::SyncError;

/// One full reconciliation run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub clone: CloneRequest,
    pub config_path: PathBuf,
    /// Restrict the pass to one named component.
    pub component: Option<ComponentName>,
}

/// Decisions from a completed run, in config order.
#[derive(Debug)]
pub struct RunReport {
    pub decisions: Vec<Decision>,
}

/// Clone the snapshot, fetch its manifest, and reconcile the config.
///
/// The config document is loaded up front, so a bad path or malformed
/// document fails before any network traffic. The clone workdir is scoped
/// to this function and removed on every path out of it.
pub fn run(request: &RunRequest) -> Result<RunReport, SyncError> {
    ConfigDocument::load(&request.config_path)?;

    let workdir = Workdir::new()?;
    let target = workdir.clone_target(&request.clone.repo);
    clone_snapshot(&request.clone, &target)?;

    tracing::info!("fetching latest manifest from snapshot");
    let entries = manifest::fetch_latest(&target)?;

    let decisions =
        reconcile::reconcile(&request.config_path, &entries, request.component.as_ref())?;
    Ok(RunReport { decisions })
}
