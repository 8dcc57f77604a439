//! Create disposable test branches.

use super::{open_repository, Globals};
use anyhow::{Context, Result};
use git_branch_delete::git::{sanitize_branch_name, Git, GitError};
use git_branch_delete::output::{CliOutput, Output, OutputConfig};
use uuid::Uuid;

#[derive(clap::Args)]
#[command(about = "Create disposable test branches")]
#[command(long_about = r#"
Creates randomly named test branches, each with one empty commit, and
pushes them to the configured remote. Useful for trying out the deletion
commands without touching real work.

Branch names look like test-3fa9. Push failures are reported as warnings
so the command still works in repositories without a reachable remote.
The starting branch is checked out again when done.
"#)]
pub struct Args {
    #[arg(
        short = 'n',
        long = "count",
        default_value_t = 5,
        help = "Number of branches to create"
    )]
    pub count: usize,
}

pub fn run(args: &Args, globals: &Globals) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(globals.quiet, globals.verbose));
    let git = open_repository(globals)?;

    if args.count == 0 {
        output.info("Nothing to create.");
        return Ok(());
    }
    if args.count > 100 {
        anyhow::bail!("refusing to create {} branches; use 100 or fewer", args.count);
    }

    let start_branch = git
        .current_branch()
        .context("could not determine the starting branch")?;

    if git.settings().dry_run {
        for _ in 0..args.count {
            output.info(&format!("Would create branch '{}'", seed_name()));
        }
        output.result("Dry run complete - no changes made");
        return Ok(());
    }

    let mut created = 0usize;
    for _ in 0..args.count {
        let name = seed_name();
        if let Err(e) = seed_branch(&git, &name) {
            output.warning(&format!("could not create '{name}': {e}"));
            continue;
        }
        created += 1;

        match git.push_branch(&name) {
            Ok(()) => output.success(&format!("Created and pushed '{name}'")),
            Err(e) => output.warning(&format!("created '{name}' but push failed: {e}")),
        }
    }

    git.checkout(&start_branch)
        .with_context(|| format!("failed to return to '{start_branch}'"))?;

    output.result(&format!(
        "Created {created} of {} test branch{}; back on '{start_branch}'",
        args.count,
        if args.count == 1 { "" } else { "es" }
    ));
    Ok(())
}

fn seed_branch(git: &Git, name: &str) -> Result<(), GitError> {
    git.create_branch(name)?;
    git.commit_empty(&format!("seed-{name}"))
}

/// Random `test-<hex>` name drawn from the random tail of a v7 UUID.
fn seed_name() -> String {
    let id = Uuid::now_v7().simple().to_string();
    let suffix = &id[id.len() - 4..];
    sanitize_branch_name(&format!("test-{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_branch_delete::git::validate_branch_name;
    use std::collections::HashSet;

    #[test]
    fn test_seed_name_shape() {
        let name = seed_name();
        assert!(name.starts_with("test-"), "unexpected name: {name}");
        assert_eq!(name.len(), 9);
        validate_branch_name(&name).unwrap();
    }

    #[test]
    fn test_seed_names_vary() {
        let names: HashSet<String> = (0..20).map(|_| seed_name()).collect();
        assert!(names.len() > 1);
    }
}
