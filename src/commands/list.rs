//! List branches with the classification used by the deletion commands.

use super::{open_repository, Globals};
use anyhow::{Context, Result};
use git_branch_delete::git::Branch;
use git_branch_delete::output::{CliOutput, Output, OutputConfig};
use git_branch_delete::styles;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Modify, Style, Width},
};

#[derive(clap::Args)]
#[command(about = "List branches with status information")]
#[command(long_about = r#"
Lists branches with the classification the deletion commands act on.

Each branch is shown with:
  - A `*` marker for the currently checked-out branch
  - Branch name and abbreviated commit hash
  - Subject line of the tip commit (truncated to 30 chars)
  - Status flags: default, remote, merged, stale, behind

Local branches are listed by default; use --remote for remote-tracking
branches or --all for both. Use --json for machine-readable output
suitable for scripting.
"#)]
pub struct Args {
    #[arg(
        short,
        long,
        help = "List remote-tracking branches instead of local ones"
    )]
    pub remote: bool,

    #[arg(short, long, help = "List both local and remote-tracking branches")]
    pub all: bool,

    #[arg(long, help = "Output in JSON format")]
    pub json: bool,
}

pub fn run(args: &Args, globals: &Globals) -> Result<()> {
    let mut output = CliOutput::new(OutputConfig::new(globals.quiet, globals.verbose));
    let git = open_repository(globals)?;

    let branches = git.list_branches().context("failed to list branches")?;
    let selected = select_branches(branches, args.remote, args.all);

    if args.json {
        return print_json(&selected);
    }

    print_table(&selected, &mut output);
    Ok(())
}

/// Filter the inventory to the requested namespace.
fn select_branches(branches: Vec<Branch>, remote: bool, all: bool) -> Vec<Branch> {
    branches
        .into_iter()
        .filter(|b| all || b.is_remote == remote)
        .collect()
}

fn print_json(branches: &[Branch]) -> Result<()> {
    let entries: Vec<serde_json::Value> = branches.iter().map(branch_json).collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn branch_json(branch: &Branch) -> serde_json::Value {
    serde_json::json!({
        "name": branch.name,
        "commit": branch.commit_hash,
        "message": branch.message,
        "reference": branch.reference,
        "is_current": branch.is_current,
        "is_remote": branch.is_remote,
        "is_default": branch.is_default,
        "is_merged": branch.is_merged,
        "is_stale": branch.is_stale,
        "is_behind": branch.is_behind,
        "tracking": branch.tracking_branch,
    })
}

fn print_table(branches: &[Branch], output: &mut dyn Output) {
    if branches.is_empty() {
        output.info("No branches found.");
        return;
    }

    let use_color = styles::colors_enabled();
    output.info(&format!(
        "Found {} branch{}:",
        branches.len(),
        if branches.len() == 1 { "" } else { "es" }
    ));

    let mut builder = Builder::new();
    let header: Vec<String> = ["", "Branch", "Commit", "Message", "Status"]
        .iter()
        .map(|h| {
            if use_color && !h.is_empty() {
                styles::dim(h)
            } else {
                (*h).to_string()
            }
        })
        .collect();
    builder.push_record(header);

    for branch in branches {
        let marker = if branch.is_current {
            if use_color {
                styles::green("*")
            } else {
                "*".to_string()
            }
        } else {
            " ".to_string()
        };

        let status = status_flags(branch)
            .iter()
            .map(|flag| {
                if use_color {
                    colored_flag(flag)
                } else {
                    (*flag).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            &marker,
            &branch.name,
            &branch.commit_hash,
            &branch.message,
            &status,
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::blank())
        .with(Modify::new(Columns::one(3)).with(Width::truncate(40).suffix("...")));

    println!("{table}");
}

/// Status flags for one branch, in display order.
fn status_flags(branch: &Branch) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if branch.is_default {
        flags.push("default");
    }
    if branch.is_remote {
        flags.push("remote");
    }
    if branch.is_merged {
        flags.push("merged");
    }
    if branch.is_stale {
        flags.push("stale");
    }
    if branch.is_behind {
        flags.push("behind");
    }
    flags
}

fn colored_flag(flag: &str) -> String {
    match flag {
        "default" => styles::red(flag),
        "remote" => styles::cyan(flag),
        "merged" => styles::green(flag),
        "stale" | "behind" => styles::yellow(flag),
        _ => flag.to_string(),
    }
}
