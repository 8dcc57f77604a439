//! Shell completion generation.

use anyhow::Result;
use clap_complete::{generate, Shell};
use std::io;

#[derive(clap::Args)]
#[command(about = "Generate shell completion scripts")]
#[command(long_about = r#"
Prints a completion script for the given shell to stdout.

Typical installation:

  git-branch-delete completions bash > ~/.local/share/bash-completion/completions/git-branch-delete
  git-branch-delete completions zsh  > ~/.zfunc/_git-branch-delete
  git-branch-delete completions fish > ~/.config/fish/completions/git-branch-delete.fish
"#)]
pub struct Args {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

pub fn run(args: &Args, mut cli: clap::Command) -> Result<()> {
    let name = cli.get_name().to_string();
    generate(args.shell, &mut cli, name, &mut io::stdout());
    Ok(())
}
