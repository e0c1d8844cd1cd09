//! # pinsync-sync
//!
//! Pipeline snapshot plumbing and the sha reconciliation pass.
//!
//! Call [`pipeline::run`] for a full clone → fetch → reconcile run, or use
//! [`manifest::fetch_latest`] and [`reconcile::reconcile`] directly against
//! an already-cloned snapshot directory.

pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod reconcile;
pub mod repo;

pub use error::SyncError;
pub use manifest::{fetch_latest, ManifestEntry};
pub use reconcile::Decision;
pub use repo::{CloneRequest, Workdir};
