//! Prune local branches whose upstream is gone.

use super::{batch_deadline, describe_branch, open_repository, Globals};
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use git_branch_delete::git::{delete_chunked, Branch};
use git_branch_delete::log_info;
use git_branch_delete::output::{CliOutput, Output, OutputConfig};

#[derive(clap::Args)]
#[command(about = "Delete local branches whose upstream is gone")]
#[command(long_about = r#"
Finds local branches whose upstream tracking branch has been deleted
("gone") and removes them.

Without --force, presents the candidates in a multi-select prompt with
everything preselected; deselect what you want to keep. With --force the
prompt is skipped and every stale branch is deleted.

Stale branches are deleted with force semantics (the merge check is
skipped) because their upstream no longer exists to compare against.
The current branch and protected branches are never offered.
"#)]
pub struct Args {
    #[arg(short, long, help = "Delete without prompting")]
    pub force: bool,
}

pub fn run(args: &Args, globals: &Globals) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(globals.quiet, globals.verbose));
    let git = open_repository(globals)?;

    let branches = git.list_branches().context("failed to list branches")?;
    let stale = stale_candidates(branches);

    if stale.is_empty() {
        output.info("No stale branches found.");
        return Ok(());
    }

    output.info(&format!(
        "Found {} stale branch{}:",
        stale.len(),
        if stale.len() == 1 { "" } else { "es" }
    ));

    let selected = if args.force {
        stale
    } else {
        match select_stale(&stale)? {
            Some(picks) if !picks.is_empty() => picks,
            Some(_) => {
                output.result("No branches selected");
                return Ok(());
            }
            None => {
                output.result("Aborted");
                return Ok(());
            }
        }
    };

    let dry_run = git.settings().dry_run;
    let deadline = batch_deadline(git.settings(), selected.len());
    let worker = git.clone();
    delete_chunked(&selected, deadline, move |branch| {
        worker.delete_branch(&branch.name, true, false)?;
        if dry_run {
            log_info!("Would delete '{}'", branch.name);
        } else {
            log_info!("Deleted '{}'", branch.name);
        }
        Ok(())
    })
    .context("prune aborted")?;

    if dry_run {
        output.result("Dry run complete - no changes made");
    } else {
        output.result(&format!(
            "Pruned {} stale branch{}",
            selected.len(),
            if selected.len() == 1 { "" } else { "es" }
        ));
    }
    Ok(())
}

/// Local branches whose upstream is gone, excluding anything unsafe to offer.
fn stale_candidates(branches: Vec<Branch>) -> Vec<Branch> {
    branches
        .into_iter()
        .filter(|b| b.is_stale && !b.is_remote && !b.is_current && !b.is_default)
        .collect()
}

fn select_stale(stale: &[Branch]) -> Result<Option<Vec<Branch>>> {
    let items: Vec<String> = stale.iter().map(describe_branch).collect();
    let defaults = vec![true; items.len()];

    let picks = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select stale branches to delete (space toggles, enter confirms)")
        .items(&items)
        .defaults(&defaults)
        .interact_opt()
        .context("selection prompt failed")?;

    Ok(picks.map(|indexes| indexes.into_iter().map(|i| stale[i].clone()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            commit_hash: "abc1234".to_string(),
            message: String::new(),
            reference: format!("refs/heads/{name}"),
            is_current: false,
            is_remote: false,
            is_default: false,
            is_merged: false,
            is_stale: false,
            is_behind: false,
            tracking_branch: String::new(),
        }
    }

    #[test]
    fn test_stale_candidates_keeps_only_stale_locals() {
        let mut stale = branch("feature/gone");
        stale.is_stale = true;

        let mut stale_remote = branch("feature/remote-gone");
        stale_remote.is_stale = true;
        stale_remote.is_remote = true;

        let fresh = branch("feature/active");

        let candidates = stale_candidates(vec![stale, stale_remote, fresh]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "feature/gone");
    }

    #[test]
    fn test_stale_candidates_never_offers_current_or_default() {
        let mut stale_current = branch("wip");
        stale_current.is_stale = true;
        stale_current.is_current = true;

        let mut stale_default = branch("develop");
        stale_default.is_stale = true;
        stale_default.is_default = true;

        assert!(stale_candidates(vec![stale_current, stale_default]).is_empty());
    }
}
