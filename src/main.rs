//! git-branch-delete - delete local and remote Git branches safely.
//!
//! Thin dispatch layer: parses the CLI, sets up logging, and routes to the
//! command modules. All branch logic lives in the library crate.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use git_branch_delete::logging::init_logging;

mod commands;

use commands::Globals;

#[derive(Parser)]
#[command(name = "git-branch-delete")]
#[command(version = git_branch_delete::VERSION_DISPLAY)]
#[command(about = "Delete local and remote Git branches safely, interactively or in bulk")]
#[command(long_about = r#"
Lists and deletes Git branches by driving the git executable directly.

Deletion is guarded: protected branches are always refused, unmerged
branches need --force, and every name is validated before any git
subprocess runs. Configuration is read from git config under the
branch-delete.* keys.
"#)]
struct Cli {
    #[arg(short, long, global = true, help = "Suppress informational output")]
    quiet: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[arg(
        long,
        global = true,
        help = "Validate and report without changing anything"
    )]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    List(commands::list::Args),
    Delete(commands::delete::Args),
    Prune(commands::prune::Args),
    Interactive(commands::interactive::Args),
    Seed(commands::seed::Args),
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let globals = Globals {
        quiet: cli.quiet,
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::List(args) => commands::list::run(&args, &globals),
        Commands::Delete(args) => commands::delete::run(&args, &globals),
        Commands::Prune(args) => commands::prune::run(&args, &globals),
        Commands::Interactive(args) => commands::interactive::run(&args, &globals),
        Commands::Seed(args) => commands::seed::run(&args, &globals),
        Commands::Completions(args) => commands::completions::run(&args, Cli::command()),
    }
}
