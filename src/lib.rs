//! Core library for git-branch-delete.
//!
//! Everything that talks to git lives in [`git`]; the remaining modules are
//! the supporting surface the binary is built from: configuration loaded from
//! `git config` ([`settings`]), the user-facing output abstraction
//! ([`output`]), leveled diagnostics ([`logging`]), and terminal styling
//! ([`styles`]).

pub mod git;
pub mod logging;
pub mod output;
pub mod settings;
pub mod styles;

pub use git::{Git, GitError};

/// Semantic version baked in at build time.
pub const VERSION: &str = env!("GBD_VERSION");

/// Version string shown by `--version`; dev builds carry branch and commit.
pub const VERSION_DISPLAY: &str = env!("GBD_VERSION_DISPLAY");
