//! Delete branches by name.

use super::{open_repository, Globals};
use anyhow::{Context, Result};
use git_branch_delete::git::{validate_branch_name, Git, GitError};
use git_branch_delete::output::{CliOutput, Output, OutputConfig};
use git_branch_delete::settings::Settings;

#[derive(clap::Args)]
#[command(about = "Delete local or remote branches")]
#[command(long_about = r#"
Deletes the named branches after validating every name.

All names are validated before anything is deleted; a single bad or
protected name aborts the whole run. Deletion itself is sequential and
stops at the first failure.

Local branches must be merged into the current branch unless --force is
given. Protected branches (main, master, develop, release by default)
are never deleted, even with --force.
"#)]
pub struct Args {
    #[arg(required = true, help = "Branches to delete")]
    pub branches: Vec<String>,

    #[arg(short, long, help = "Delete even if the branch is not merged")]
    pub force: bool,

    #[arg(
        short,
        long,
        help = "Delete the branch on the configured remote instead of locally"
    )]
    pub remote: bool,

    #[arg(
        short,
        long,
        help = "Delete both the local branch and its remote counterpart"
    )]
    pub all: bool,
}

/// A branch name that failed pre-flight validation.
#[derive(Debug)]
struct ValidationError {
    branch: String,
    message: String,
}

/// What one run deleted, for the closing summary.
#[derive(Debug, Default, PartialEq, Eq)]
struct DeletionResult {
    local: usize,
    remote: usize,
}

impl DeletionResult {
    fn total(&self) -> usize {
        self.local + self.remote
    }

    fn deleted_parts(&self) -> String {
        let mut parts = Vec::new();
        if self.local > 0 {
            parts.push(format!("{} local", self.local));
        }
        if self.remote > 0 {
            parts.push(format!("{} remote", self.remote));
        }
        parts.join(", ")
    }
}

pub fn run(args: &Args, globals: &Globals) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(globals.quiet, globals.verbose));
    let git = open_repository(globals)?;
    run_delete(args, &mut output, &git)
}

fn run_delete(args: &Args, output: &mut dyn Output, git: &Git) -> Result<()> {
    let failures = validate_names(&args.branches, git.settings());
    if !failures.is_empty() {
        for failure in &failures {
            output.error(&format!(
                "cannot delete '{}': {}",
                failure.branch, failure.message
            ));
        }
        anyhow::bail!(
            "Aborting: {} of {} branch{} failed validation",
            failures.len(),
            args.branches.len(),
            if args.branches.len() == 1 { "" } else { "es" }
        );
    }

    let dry_run = git.settings().dry_run;
    let mut result = DeletionResult::default();

    for name in &args.branches {
        if args.all || !args.remote {
            delete_local(git, output, name, args.force, dry_run)?;
            result.local += 1;
        }
        if args.all || args.remote {
            delete_remote(git, output, name, args.force, dry_run)?;
            result.remote += 1;
        }
    }

    if dry_run {
        output.result("Dry run complete - no changes made");
    } else {
        output.result(&format!(
            "Deleted {} branch{} ({})",
            result.total(),
            if result.total() == 1 { "" } else { "es" },
            result.deleted_parts()
        ));
    }
    Ok(())
}

/// Check every requested name before touching the repository.
fn validate_names(names: &[String], settings: &Settings) -> Vec<ValidationError> {
    let mut failures = Vec::new();
    for name in names {
        match validate_branch_name(name) {
            Err(GitError::InvalidName { reason, .. }) => failures.push(ValidationError {
                branch: name.clone(),
                message: reason,
            }),
            Err(other) => failures.push(ValidationError {
                branch: name.clone(),
                message: other.to_string(),
            }),
            Ok(()) if settings.is_protected(name) => failures.push(ValidationError {
                branch: name.clone(),
                message: "branch is protected".to_string(),
            }),
            Ok(()) => {}
        }
    }
    failures
}

fn delete_local(
    git: &Git,
    output: &mut dyn Output,
    name: &str,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    git.delete_branch(name, force, false)
        .with_context(|| format!("cannot delete '{name}'"))?;
    if dry_run {
        output.info(&format!("Would delete branch '{name}'"));
    } else {
        output.success(&format!("Deleted branch '{name}'"));
    }
    Ok(())
}

fn delete_remote(
    git: &Git,
    output: &mut dyn Output,
    name: &str,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let remote = git.settings().remote.clone();
    git.delete_branch(name, force, true)
        .with_context(|| format!("cannot delete '{remote}/{name}'"))?;
    if dry_run {
        output.info(&format!("Would delete remote branch '{remote}/{name}'"));
    } else {
        output.success(&format!("Deleted remote branch '{remote}/{name}'"));
    }
    Ok(())
}
