//! Ordered config document — load, component views, sha patching.
//!
//! # Document shapes
//!
//! Two on-disk shapes are accepted and normalized to the same list view:
//!
//! ```text
//! - repo_name: console          components:
//!   sha: abc123                   - repo_name: console
//! - repo_name: search               sha: abc123
//!   sha: def456                   - repo_name: search
//!                                     sha: def456
//! ```
//!
//! The document is held as a raw `serde_yaml` value tree, never re-shaped
//! through typed structs, so key order, record order, unknown fields, and
//! the bare-vs-wrapped shape all survive a rewrite exactly.
//!
//! # API pattern
//!
//! [`ConfigDocument::load`] gives a read-only snapshot for iteration;
//! [`patch_sha`] is a self-contained read-modify-write so every patch
//! applies to the current on-disk state rather than a cached copy.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::ConfigError;
use crate::types::{ComponentName, ComponentRecord};

/// Wrapper key exposing the component list in the mapping-shaped document.
pub const COMPONENTS_KEY: &str = "components";

const NAME_KEY: &str = "repo_name";
const SHA_KEY: &str = "sha";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A loaded config document: the raw value tree plus the path it came from.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    root: Value,
}

impl ConfigDocument {
    /// Load and shape-check the document at `path`.
    ///
    /// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with
    /// path + line context) if malformed YAML, and `ConfigError::Shape` if
    /// the root is neither a sequence nor a mapping with a `components`
    /// sequence.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.to_path_buf() });
        }
        let contents = std::fs::read_to_string(path)?;
        let root: Value = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), source: e })?;
        let doc = Self { path: path.to_path_buf(), root };
        doc.component_seq()?;
        Ok(doc)
    }

    /// Ordered matching views of every component record, in document order.
    pub fn components(&self) -> Result<Vec<ComponentRecord>, ConfigError> {
        Ok(self.component_seq()?.iter().map(ComponentRecord::from_value).collect())
    }

    fn component_seq(&self) -> Result<&Vec<Value>, ConfigError> {
        match &self.root {
            Value::Sequence(seq) => Some(seq),
            Value::Mapping(map) => map.get(COMPONENTS_KEY).and_then(Value::as_sequence),
            _ => None,
        }
        .ok_or_else(|| ConfigError::Shape { path: self.path.clone() })
    }

    fn component_seq_mut(&mut self) -> Result<&mut Vec<Value>, ConfigError> {
        let path = self.path.clone();
        match &mut self.root {
            Value::Sequence(seq) => Some(seq),
            Value::Mapping(map) => map.get_mut(COMPONENTS_KEY).and_then(Value::as_sequence_mut),
            _ => None,
        }
        .ok_or(ConfigError::Shape { path })
    }

    /// Write the document back in place: serialize → `.tmp` sibling →
    /// rename. The `.tmp` lives in the target's directory (same filesystem,
    /// so the rename stays atomic).
    fn save(&self) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(&self.root)?;
        let Some(file_name) = self.path.file_name() else {
            return Err(ConfigError::Io(std::io::Error::other("config path has no file name")));
        };
        let tmp = self
            .path
            .with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
        std::fs::write(&tmp, yaml)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// patch_sha
// ---------------------------------------------------------------------------

/// Outcome of a single [`patch_sha`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The first record named `repo_name` had its `sha` replaced.
    Patched,
    /// No record matched; the document was written back unchanged.
    NoMatch,
}

/// Read-modify-write a single `sha` value.
///
/// Re-reads the document from disk so the patch applies to the current file
/// state, finds the first record whose `repo_name` equals `name` and which
/// already carries a `sha` field, replaces that one value, and writes the
/// whole document back with every other field, key order, and record order
/// intact. A missing match is a no-op write, not an error: the caller has
/// already validated its component list by this point, and tolerating the
/// gap keeps repeated external invocations safe across renames.
pub fn patch_sha(
    path: &Path,
    name: &ComponentName,
    new_sha: &str,
) -> Result<PatchOutcome, ConfigError> {
    let mut doc = ConfigDocument::load(path)?;
    let outcome = patch_in_place(&mut doc, name, new_sha)?;
    doc.save()?;
    Ok(outcome)
}

fn patch_in_place(
    doc: &mut ConfigDocument,
    name: &ComponentName,
    new_sha: &str,
) -> Result<PatchOutcome, ConfigError> {
    let seq = doc.component_seq_mut()?;
    for item in seq.iter_mut() {
        let Some(map) = item.as_mapping_mut() else {
            continue;
        };
        if map.get(NAME_KEY).and_then(Value::as_str) != Some(name.0.as_str()) {
            continue;
        }
        // Only a record that already pins a sha is eligible; a name-only
        // record is passed over in favour of a later full record.
        let Some(slot) = map.get_mut(SHA_KEY) else {
            continue;
        };
        *slot = Value::String(new_sha.to_owned());
        return Ok(PatchOutcome::Patched);
    }
    Ok(PatchOutcome::NoMatch)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
