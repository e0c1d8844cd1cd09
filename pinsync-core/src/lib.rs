//! pinsync core library — config document model, sha patching, errors.
//!
//! Public API surface:
//! - [`types`] — [`ComponentName`] and the [`ComponentRecord`] view
//! - [`error`] — [`ConfigError`]
//! - [`document`] — load / patch of the ordered config document

pub mod document;
pub mod error;
pub mod types;

pub use document::{patch_sha, ConfigDocument, PatchOutcome};
pub use error::ConfigError;
pub use types::{ComponentName, ComponentRecord};
