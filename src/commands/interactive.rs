//! Interactive multi-select branch deletion.

use super::{batch_deadline, describe_branch, open_repository, Globals};
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use git_branch_delete::git::{delete_all, Branch, DeletionOutcome, Git};
use git_branch_delete::output::{CliOutput, Output, OutputConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(clap::Args)]
#[command(about = "Select branches to delete interactively")]
#[command(long_about = r#"
Presents deletable branches in a multi-select prompt and deletes the
selection concurrently, reporting a per-branch breakdown at the end.

The current branch and protected branches are never offered. Remote
branches are included with --all. Unmerged branches fail unless --force
is given; one branch failing never stops the others.

Refuses a selection that covers every offered branch; keep at least one
or use the delete command with an explicit list.
"#)]
pub struct Args {
    #[arg(short, long, help = "Include remote branches in the selection")]
    pub all: bool,

    #[arg(short, long, help = "Delete even if a branch is not merged")]
    pub force: bool,
}

pub fn run(args: &Args, globals: &Globals) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(globals.quiet, globals.verbose));
    let git = open_repository(globals)?;

    let branches = git.list_branches().context("failed to list branches")?;
    let candidates = deletable(branches, args.all);

    if candidates.is_empty() {
        output.info("No deletable branches found.");
        return Ok(());
    }

    let items: Vec<String> = candidates.iter().map(describe_branch).collect();
    let picks = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select branches to delete (space toggles, enter confirms)")
        .items(&items)
        .interact_opt()
        .context("selection prompt failed")?;

    let Some(picks) = picks else {
        output.result("Aborted");
        return Ok(());
    };
    if picks.is_empty() {
        output.result("No branches selected");
        return Ok(());
    }
    if picks.len() == candidates.len() {
        anyhow::bail!(
            "refusing to delete every offered branch; keep at least one \
             or use the delete command with an explicit list"
        );
    }

    let selected: Vec<Branch> = picks.into_iter().map(|i| candidates[i].clone()).collect();
    let outcomes = delete_selection(&git, &selected, args.force);
    report(&selected, outcomes, &mut output, git.settings().dry_run)
}

/// Branches safe to offer for deletion.
fn deletable(branches: Vec<Branch>, include_remote: bool) -> Vec<Branch> {
    branches
        .into_iter()
        .filter(|b| !b.is_current && !b.is_default)
        .filter(|b| include_remote || !b.is_remote)
        .collect()
}

fn delete_selection(git: &Git, selected: &[Branch], force: bool) -> Vec<DeletionOutcome> {
    let deadline = batch_deadline(git.settings(), selected.len());

    let bar = ProgressBar::new(selected.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} deleting {msg} [{pos}/{len}]").unwrap(),
    );
    bar.enable_steady_tick(Duration::from_millis(80));

    let worker = git.clone();
    let progress = bar.clone();
    let outcomes = delete_all(selected, deadline, move |branch| {
        progress.set_message(branch.name.clone());
        let result = worker.delete_branch(&branch.name, force, branch.is_remote);
        progress.inc(1);
        result
    });

    bar.finish_and_clear();
    outcomes
}

/// Print the per-branch breakdown and fold it into an exit status.
fn report(
    selected: &[Branch],
    mut outcomes: Vec<DeletionOutcome>,
    output: &mut dyn Output,
    dry_run: bool,
) -> Result<()> {
    outcomes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut failed = 0usize;
    for outcome in &outcomes {
        if outcome.succeeded {
            let verb = if dry_run { "would delete" } else { "deleted" };
            output.list_item(&format!("{}: {}", outcome.name, verb));
        } else {
            failed += 1;
            let reason = outcome
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown failure".to_string());
            output.list_item(&format!("{}: {}", outcome.name, reason));
        }
    }

    let unfinished = selected.len().saturating_sub(outcomes.len());
    if unfinished > 0 {
        output.warning(&format!(
            "{unfinished} deletion{} did not start before the deadline",
            if unfinished == 1 { "" } else { "s" }
        ));
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} deletions failed", selected.len());
    }
    if unfinished > 0 {
        anyhow::bail!(
            "deadline exceeded with {unfinished} branch{} not attempted",
            if unfinished == 1 { "" } else { "es" }
        );
    }

    if dry_run {
        output.result("Dry run complete - no changes made");
    } else {
        output.result(&format!(
            "Deleted {} branch{}",
            outcomes.len(),
            if outcomes.len() == 1 { "" } else { "es" }
        ));
    }
    Ok(())
}
