//! Domain types for the pinsync config document.
//!
//! Component records live on disk as free-form YAML mappings; the typed
//! [`ComponentRecord`] here is a read-only matching view. The raw document
//! value tree stays authoritative so unknown fields survive rewrites.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a tracked component (`repo_name` in the config,
/// `image-name` in the pipeline manifest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentName(pub String);

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Record view
// ---------------------------------------------------------------------------

/// Matching view of one config list item.
///
/// Only the two fields the reconciler needs are surfaced; everything else in
/// the record belongs to the raw document and is never touched. A record
/// missing either field is not trackable and gets skipped, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ComponentRecord {
    #[serde(default)]
    pub repo_name: Option<ComponentName>,
    #[serde(default)]
    pub sha: Option<String>,
}

impl ComponentRecord {
    /// View of one raw list item. Non-mapping items, and items whose
    /// `repo_name`/`sha` are not strings, come back untrackable rather than
    /// failing the run.
    pub fn from_value(value: &serde_yaml::Value) -> Self {
        serde_yaml::from_value(value.clone()).unwrap_or_default()
    }

    /// A record needs both a name and a pinned sha to take part in a
    /// reconciliation pass.
    pub fn is_trackable(&self) -> bool {
        self.repo_name.is_some() && self.sha.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(ComponentName::from("multicloud-operators").to_string(), "multicloud-operators");
    }

    #[test]
    fn newtype_equality() {
        let a = ComponentName::from("x");
        let b = ComponentName::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn record_view_reads_name_and_sha() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("repo_name: console\nsha: abc123\nbranch: main\n").unwrap();
        let record = ComponentRecord::from_value(&value);
        assert_eq!(record.repo_name, Some(ComponentName::from("console")));
        assert_eq!(record.sha, Some("abc123".to_string()));
        assert!(record.is_trackable());
    }

    #[test]
    fn record_view_tolerates_missing_fields() {
        let value: serde_yaml::Value = serde_yaml::from_str("repo_name: console\n").unwrap();
        let record = ComponentRecord::from_value(&value);
        assert_eq!(record.repo_name, Some(ComponentName::from("console")));
        assert_eq!(record.sha, None);
        assert!(!record.is_trackable());
    }

    #[test]
    fn record_view_of_non_mapping_is_untrackable() {
        let value = serde_yaml::Value::String("not a record".to_string());
        let record = ComponentRecord::from_value(&value);
        assert_eq!(record, ComponentRecord::default());
        assert!(!record.is_trackable());
    }
}
