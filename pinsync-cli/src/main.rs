//! pinsync — pipeline manifest sha synchronization CLI.
//!
//! # Usage
//!
//! ```text
//! pinsync --repo <pipeline-repo> --branch <branch> [--org <org>] \
//!         [--component <name>] [--config <path>]
//! ```
//!
//! Clones the named branch of the pipeline repository, reads its
//! `manifest.json`, and rewrites stale `sha` pins in the local config
//! document. Set `GH_READ_PAT` to clone over authenticated HTTPS.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use pinsync_core::ComponentName;
use pinsync_sync::{
    pipeline::{self, RunRequest},
    repo::{CloneRequest, TOKEN_ENV},
    Decision,
};

/// Default owning organization of the pipeline repository.
const DEFAULT_ORG: &str = "stolostron";
/// Default config document path, relative to the working directory.
const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "pinsync",
    version,
    about = "Reconcile pinned component shas against the pipeline build manifest",
    long_about = None,
)]
struct Cli {
    /// Owning organization of the pipeline repository.
    #[arg(long, default_value = DEFAULT_ORG)]
    org: String,

    /// Pipeline repository to clone.
    #[arg(long)]
    repo: String,

    /// Branch to check out after cloning.
    #[arg(long)]
    branch: String,

    /// Restrict reconciliation to one named component.
    #[arg(long)]
    component: Option<String>,

    /// Path to the local config document.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    tracing::info!("starting pipeline manifest sha sync");

    let repo = cli.repo.clone();
    let request = RunRequest {
        clone: CloneRequest {
            org: cli.org,
            repo: cli.repo,
            branch: cli.branch,
            token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
        },
        config_path: cli.config,
        component: cli.component.map(ComponentName::from),
    };

    let report = pipeline::run(&request)
        .with_context(|| format!("sha sync failed for pipeline repository '{repo}'"))?;

    print_report(&report.decisions);
    tracing::info!("all components processed");
    Ok(())
}

fn print_report(decisions: &[Decision]) {
    if decisions.is_empty() {
        println!("No trackable components in config. Nothing to do.");
        return;
    }

    for decision in decisions {
        match decision {
            Decision::Updated { name, old_sha, new_sha } => {
                println!("  {}  {name}: {old_sha} -> {new_sha}", "✎".yellow())
            }
            Decision::UpToDate { name } => println!("  {}  {name}: up to date", "·".green()),
            Decision::Skipped { name: Some(name) } => {
                println!("  {}  {name}: not trackable, skipped", "-".dimmed())
            }
            Decision::Skipped { name: None } => {
                println!("  {}  unnamed record skipped", "-".dimmed())
            }
        }
    }

    let updated = decisions
        .iter()
        .filter(|d| matches!(d, Decision::Updated { .. }))
        .count();
    println!("✓ {} component(s) checked, {updated} updated", decisions.len());
}
