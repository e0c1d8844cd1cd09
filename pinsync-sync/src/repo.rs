//! Pipeline snapshot clone plumbing.
//!
//! Shells out to the system `git` binary: `clone` into a scoped workdir,
//! then `checkout` of the requested branch inside the clone. Both phases
//! are synchronous blocking calls with no timeout or retry — a failure in
//! either is fatal to the run.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use crate::error::{io_err, SyncError};

/// Environment variable holding the optional clone token.
pub const TOKEN_ENV: &str = "GH_READ_PAT";

// ---------------------------------------------------------------------------
// Clone request
// ---------------------------------------------------------------------------

/// Explicit clone configuration — passed in by the caller, never read from
/// process-wide state.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub org: String,
    pub repo: String,
    pub branch: String,
    /// Token embedded in the HTTPS clone URL; `None` clones anonymously.
    pub token: Option<String>,
}

impl CloneRequest {
    fn clone_url(&self) -> String {
        match self.token.as_deref() {
            Some(token) => format!("https://{token}@github.com/{}/{}.git", self.org, self.repo),
            None => format!("https://github.com/{}/{}.git", self.org, self.repo),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoped workdir
// ---------------------------------------------------------------------------

/// Scoped temporary directory holding the clone for one run.
///
/// Removal happens on drop, so the clone is cleaned up on every exit path —
/// success, fatal fetch errors, and early aborts alike.
#[derive(Debug)]
pub struct Workdir(TempDir);

impl Workdir {
    pub fn new() -> Result<Self, SyncError> {
        let dir = TempDir::new().map_err(|e| io_err(std::env::temp_dir(), e))?;
        Ok(Self(dir))
    }

    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Target directory for the snapshot clone, named after the repository.
    pub fn clone_target(&self, repo: &str) -> PathBuf {
        self.0.path().join(repo)
    }
}

// ---------------------------------------------------------------------------
// Clone
// ---------------------------------------------------------------------------

/// Clone the pipeline repository into `target` and check out the requested
/// branch.
pub fn clone_snapshot(request: &CloneRequest, target: &Path) -> Result<(), SyncError> {
    if request.token.is_none() {
        tracing::warn!("{TOKEN_ENV} not set; cloning without authentication");
    }
    tracing::info!(
        "cloning {}/{} (branch: {}) into {}",
        request.org,
        request.repo,
        request.branch,
        target.display()
    );

    let clone = Command::new("git")
        .arg("clone")
        .arg(request.clone_url())
        .arg(target)
        .output()
        .map_err(|e| clone_err(request, format!("failed to execute git: {e}")))?;
    check_git_output(request, "clone", &clone)?;

    let checkout = Command::new("git")
        .arg("checkout")
        .arg(&request.branch)
        .current_dir(target)
        .output()
        .map_err(|e| clone_err(request, format!("failed to execute git: {e}")))?;
    check_git_output(request, "checkout", &checkout)?;

    Ok(())
}

fn check_git_output(request: &CloneRequest, phase: &str, output: &Output) -> Result<(), SyncError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(clone_err(
        request,
        format!(
            "git {phase} exited with {}: {}",
            output.status,
            redact(stderr.trim(), request.token.as_deref())
        ),
    ))
}

fn clone_err(request: &CloneRequest, detail: String) -> SyncError {
    SyncError::Clone {
        org: request.org.clone(),
        repo: request.repo.clone(),
        branch: request.branch.clone(),
        detail,
    }
}

/// The token must never reach logs or error text; git echoes the clone URL
/// into stderr on failure.
fn redact(detail: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => detail.replace(token, "***"),
        _ => detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: Option<&str>) -> CloneRequest {
        CloneRequest {
            org: "stolostron".to_string(),
            repo: "pipeline".to_string(),
            branch: "2.9-integration".to_string(),
            token: token.map(str::to_owned),
        }
    }

    #[test]
    fn anonymous_clone_url() {
        assert_eq!(
            request(None).clone_url(),
            "https://github.com/stolostron/pipeline.git"
        );
    }

    #[test]
    fn token_embeds_in_clone_url() {
        assert_eq!(
            request(Some("s3cret")).clone_url(),
            "https://s3cret@github.com/stolostron/pipeline.git"
        );
    }

    #[test]
    fn redact_scrubs_token_from_detail() {
        let detail = "fatal: unable to access 'https://s3cret@github.com/x/y.git'";
        let scrubbed = redact(detail, Some("s3cret"));
        assert!(!scrubbed.contains("s3cret"));
        assert!(scrubbed.contains("***@github.com"));
    }

    #[test]
    fn redact_without_token_is_identity() {
        let detail = "fatal: repository not found";
        assert_eq!(redact(detail, None), detail);
        assert_eq!(redact(detail, Some("")), detail);
    }

    #[test]
    fn workdir_is_removed_on_drop() {
        let workdir = Workdir::new().expect("workdir");
        let path = workdir.path().to_path_buf();
        assert!(path.exists());
        drop(workdir);
        assert!(!path.exists(), "workdir must be cleaned up on drop");
    }

    #[test]
    fn clone_target_is_named_after_repo() {
        let workdir = Workdir::new().expect("workdir");
        let target = workdir.clone_target("pipeline");
        assert_eq!(target, workdir.path().join("pipeline"));
    }
}
