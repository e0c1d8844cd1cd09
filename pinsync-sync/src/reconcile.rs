//! Core reconciliation pass: pinned sha vs built sha, patch on mismatch.
//!
//! Decision rules:
//! 1. A record without `repo_name` or `sha` is not trackable — skipped.
//! 2. The first manifest entry whose `image-name` equals the record's
//!    `repo_name` is authoritative; later duplicates are ignored.
//! 3. Hashes compare by plain string equality, no case or prefix
//!    normalization.
//! 4. A confirmed mismatch is patched immediately through a fresh
//!    read-modify-write of the document, never batched.

use std::path::Path;

use pinsync_core::{document, ComponentName, ConfigDocument};

use crate::error::SyncError;
use crate::manifest::ManifestEntry;

/// Outcome of evaluating one component record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Pinned hash was stale; the config has already been patched.
    Updated {
        name: ComponentName,
        old_sha: String,
        new_sha: String,
    },
    /// Manifest agrees with the pin, or no manifest entry names the
    /// component.
    UpToDate { name: ComponentName },
    /// Record lacks `repo_name` or `sha` and cannot be reconciled.
    Skipped { name: Option<ComponentName> },
}

/// Run one reconciliation pass over the config at `config_path`.
///
/// The component list is snapshotted once for iteration; each confirmed
/// mismatch re-reads the document from disk before patching, so successive
/// patches always apply to the latest on-disk state. The pass itself is
/// stateless across components — evaluation order cannot change outcomes.
///
/// `filter` restricts the pass to one named component; everything else is
/// left untouched on disk and absent from the returned decisions.
pub fn reconcile(
    config_path: &Path,
    manifest: &[ManifestEntry],
    filter: Option<&ComponentName>,
) -> Result<Vec<Decision>, SyncError> {
    let doc = ConfigDocument::load(config_path)?;
    let mut decisions = Vec::new();

    for record in doc.components()? {
        if let Some(wanted) = filter {
            if record.repo_name.as_ref() != Some(wanted) {
                continue;
            }
        }

        let Some(name) = record.repo_name else {
            tracing::debug!("skipping unnamed config record");
            decisions.push(Decision::Skipped { name: None });
            continue;
        };
        let Some(pinned) = record.sha else {
            tracing::debug!("skipping {name}: no pinned sha");
            decisions.push(Decision::Skipped { name: Some(name) });
            continue;
        };

        tracing::info!("checking component for updates: {name}");
        let built = manifest.iter().find_map(|entry| entry.built_sha_for(&name.0));
        match built {
            Some(built) if built != pinned => {
                tracing::warn!("sha mismatch for {name}: pinned {pinned}, built {built}");
                document::patch_sha(config_path, &name, built)?;
                decisions.push(Decision::Updated {
                    name,
                    old_sha: pinned,
                    new_sha: built.to_owned(),
                });
            }
            _ => {
                tracing::info!("no sha mismatch for {name}");
                decisions.push(Decision::UpToDate { name });
            }
        }
    }

    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, contents).expect("write config");
        path
    }

    fn entry(name: &str, sha: &str) -> ManifestEntry {
        ManifestEntry {
            image_name: Some(name.to_string()),
            git_sha256: Some(sha.to_string()),
        }
    }

    fn shas(path: &Path) -> Vec<Option<String>> {
        ConfigDocument::load(path)
            .expect("reload")
            .components()
            .expect("components")
            .into_iter()
            .map(|r| r.sha)
            .collect()
    }

    #[test]
    fn mismatch_patches_and_reports_updated() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: '111'\n");

        let decisions = reconcile(&path, &[entry("console", "999")], None).expect("reconcile");
        assert_eq!(
            decisions,
            vec![Decision::Updated {
                name: ComponentName::from("console"),
                old_sha: "111".to_string(),
                new_sha: "999".to_string(),
            }]
        );
        assert_eq!(shas(&path), vec![Some("999".to_string())]);
    }

    #[test]
    fn equal_sha_reports_up_to_date() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: '111'\n");

        let decisions = reconcile(&path, &[entry("console", "111")], None).expect("reconcile");
        assert_eq!(decisions, vec![Decision::UpToDate { name: ComponentName::from("console") }]);
    }

    #[test]
    fn unmatched_component_is_up_to_date_not_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: '111'\n");

        let decisions = reconcile(&path, &[entry("search", "999")], None).expect("reconcile");
        assert_eq!(decisions, vec![Decision::UpToDate { name: ComponentName::from("console") }]);
        assert_eq!(shas(&path), vec![Some("111".to_string())]);
    }

    #[test]
    fn untrackable_records_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "\
- repo_name: console
- sha: '111'
- notes: neither field
",
        );

        let decisions = reconcile(&path, &[entry("console", "999")], None).expect("reconcile");
        assert_eq!(
            decisions,
            vec![
                Decision::Skipped { name: Some(ComponentName::from("console")) },
                Decision::Skipped { name: None },
                Decision::Skipped { name: None },
            ]
        );
    }

    #[test]
    fn first_manifest_entry_wins_on_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: '111'\n");

        let manifest = [entry("console", "999"), entry("console", "888")];
        let decisions = reconcile(&path, &manifest, None).expect("reconcile");
        assert_eq!(
            decisions,
            vec![Decision::Updated {
                name: ComponentName::from("console"),
                old_sha: "111".to_string(),
                new_sha: "999".to_string(),
            }]
        );
        assert_eq!(shas(&path), vec![Some("999".to_string())]);
    }

    #[test]
    fn sha_less_manifest_entry_defers_to_later_full_entry() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: '111'\n");

        let manifest = [
            ManifestEntry { image_name: Some("console".to_string()), git_sha256: None },
            entry("console", "999"),
        ];
        let decisions = reconcile(&path, &manifest, None).expect("reconcile");
        assert!(matches!(decisions[0], Decision::Updated { .. }));
        assert_eq!(shas(&path), vec![Some("999".to_string())]);
    }

    #[test]
    fn filter_restricts_both_patching_and_decisions() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "\
- repo_name: console
  sha: '111'
- repo_name: search
  sha: '222'
",
        );

        let manifest = [entry("console", "999"), entry("search", "888")];
        let wanted = ComponentName::from("search");
        let decisions = reconcile(&path, &manifest, Some(&wanted)).expect("reconcile");

        assert_eq!(decisions.len(), 1);
        assert!(matches!(&decisions[0], Decision::Updated { name, .. } if name == &wanted));
        // Stale but unfiltered `console` stays pinned.
        assert_eq!(shas(&path), vec![Some("111".to_string()), Some("888".to_string())]);
    }

    #[test]
    fn hash_comparison_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "- repo_name: console\n  sha: 'ABC'\n");

        let decisions = reconcile(&path, &[entry("console", "abc")], None).expect("reconcile");
        assert!(matches!(decisions[0], Decision::Updated { .. }), "case differences are real updates");
        assert_eq!(shas(&path), vec![Some("abc".to_string())]);
    }
}
