//! Command implementations for the git-branch-delete binary.
//!
//! Each module owns one subcommand: its clap `Args` struct and a `run` entry
//! point dispatched from `main`.

use anyhow::{Context, Result};
use git_branch_delete::git::{Branch, Git};
use git_branch_delete::settings::Settings;
use std::time::Instant;

pub mod completions;
pub mod delete;
pub mod interactive;
pub mod list;
pub mod prune;
pub mod seed;

/// Global flags shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Globals {
    pub quiet: bool,
    pub verbose: bool,
    pub dry_run: bool,
}

/// Open the repository at the current directory and load its settings.
///
/// The `--dry-run` flag ORs into the configured value so either source can
/// enable it.
fn open_repository(globals: &Globals) -> Result<Git> {
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    let git = Git::open(&cwd)?;
    let mut settings = Settings::load(&git).context("failed to load configuration")?;
    settings.dry_run = settings.dry_run || globals.dry_run;
    Ok(git.with_settings(settings))
}

/// Wall-clock deadline for a batch over `count` branches.
///
/// Scales the per-call timeout by the branch count so large batches are not
/// starved by a budget sized for a single deletion.
fn batch_deadline(settings: &Settings, count: usize) -> Instant {
    let factor = u32::try_from(count.max(1)).unwrap_or(u32::MAX);
    Instant::now() + settings.timeout.saturating_mul(factor)
}

/// One-line description of a branch for selection prompts.
fn describe_branch(branch: &Branch) -> String {
    let mut tags = Vec::new();
    if branch.is_remote {
        tags.push("remote");
    }
    if branch.is_stale {
        tags.push("stale");
    }
    if branch.is_behind {
        tags.push("behind");
    }
    if !branch.is_remote && !branch.is_merged {
        tags.push("unmerged");
    }

    let mut line = format!("{} ({})", branch.name, branch.commit_hash);
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if !branch.message.is_empty() {
        line.push(' ');
        line.push_str(&branch.message);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            commit_hash: "abc1234".to_string(),
            message: "add feature".to_string(),
            reference: format!("refs/heads/{name}"),
            is_current: false,
            is_remote: false,
            is_default: false,
            is_merged: true,
            is_stale: false,
            is_behind: false,
            tracking_branch: String::new(),
        }
    }

    #[test]
    fn test_describe_branch_plain_merged_local() {
        assert_eq!(
            describe_branch(&branch("feature/a")),
            "feature/a (abc1234) add feature"
        );
    }

    #[test]
    fn test_describe_branch_collects_tags() {
        let mut b = branch("feature/b");
        b.is_merged = false;
        b.is_stale = true;
        assert_eq!(
            describe_branch(&b),
            "feature/b (abc1234) [stale, unmerged] add feature"
        );
    }

    #[test]
    fn test_describe_branch_remote_skips_unmerged_tag() {
        let mut b = branch("feature/c");
        b.is_remote = true;
        b.is_merged = false;
        b.message = String::new();
        assert_eq!(describe_branch(&b), "feature/c (abc1234) [remote]");
    }

    #[test]
    fn test_batch_deadline_scales_with_count() {
        let settings = Settings {
            timeout: Duration::from_secs(10),
            ..Settings::default()
        };
        let start = Instant::now();
        let five = batch_deadline(&settings, 5);
        assert!(five - start >= Duration::from_secs(49));

        // Zero branches still gets one timeout's worth of budget.
        let zero = batch_deadline(&settings, 0);
        assert!(zero - start >= Duration::from_secs(9));
        assert!(zero - start <= Duration::from_secs(11));
    }
}
