//! Git config-based settings for git-branch-delete.
//!
//! This module provides user-configurable options via `git config`.
//! Settings are loaded from git's layered config system (local → global)
//! with built-in defaults as fallback.
//!
//! # Config Keys
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `branch-delete.protected` | `main, master, develop, release` | Branches that are never deleted (multi-valued) |
//! | `branch-delete.remote` | `"origin"` | Remote used for remote-branch operations |
//! | `branch-delete.dryrun` | `false` | Validate and report without deleting |
//! | `branch-delete.timeout` | `30` | Per-invocation timeout in seconds |
//!
//! The protected list is multi-valued: every `--add`ed value, and every
//! comma-separated name within a value, is an entry. Setting any value
//! replaces the built-in list rather than extending it.
//!
//! # Example
//!
//! ```bash
//! # Protect two extra branches in this repository
//! git config --add branch-delete.protected staging
//! git config --add branch-delete.protected production
//!
//! # Use a different remote for this repository
//! git config branch-delete.remote upstream
//!
//! # Give slow remotes more time, everywhere
//! git config --global branch-delete.timeout 120
//! ```

use crate::git::Git;
use anyhow::Result;
use std::time::Duration;

/// Default values for settings.
pub mod defaults {
    /// Branch names that must never be deleted.
    pub const PROTECTED_BRANCHES: &[&str] = &["main", "master", "develop", "release"];

    /// Default value for the remote setting.
    pub const REMOTE: &str = "origin";

    /// Default value for the dryrun setting.
    pub const DRY_RUN: bool = false;

    /// Default per-invocation timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Git config keys for git-branch-delete settings.
pub mod keys {
    /// Config key for the protected branch list (multi-valued).
    pub const PROTECTED: &str = "branch-delete.protected";

    /// Config key for the remote setting.
    pub const REMOTE: &str = "branch-delete.remote";

    /// Config key for the dryrun setting.
    pub const DRY_RUN: &str = "branch-delete.dryrun";

    /// Config key for the timeout setting, in seconds.
    pub const TIMEOUT: &str = "branch-delete.timeout";
}

/// User-configurable settings.
///
/// Settings are loaded from git config with the following priority:
/// 1. Repository-local config (`git config branch-delete.x`)
/// 2. Global config (`git config --global branch-delete.x`)
/// 3. Built-in defaults
///
/// The struct is an explicit value threaded into [`Git`], never global state,
/// so tests can construct arbitrary configurations directly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Branch names that must never be deleted, matched case-insensitively.
    pub protected: Vec<String>,

    /// Remote name for remote-branch operations.
    pub remote: String,

    /// Validate and report without performing deletions.
    pub dry_run: bool,

    /// Wall-clock budget for a single git invocation.
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            protected: defaults::PROTECTED_BRANCHES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            remote: defaults::REMOTE.to_string(),
            dry_run: defaults::DRY_RUN,
            timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Load settings from git config (local + global).
    ///
    /// Unset keys fall back to defaults; an unreadable config reads as
    /// entirely unset.
    pub fn load(git: &Git) -> Result<Self> {
        let mut settings = Self::default();

        let protected = git.config_get_all(keys::PROTECTED)?;
        if !protected.is_empty() {
            settings.protected = parse_list(&protected);
        }

        if let Some(value) = git.config_get(keys::REMOTE)? {
            if !value.is_empty() {
                settings.remote = value;
            }
        }

        if let Some(value) = git.config_get(keys::DRY_RUN)? {
            settings.dry_run = parse_bool(&value, defaults::DRY_RUN);
        }

        if let Some(value) = git.config_get(keys::TIMEOUT)? {
            if let Ok(secs) = value.parse::<u64>() {
                if secs > 0 {
                    settings.timeout = Duration::from_secs(secs);
                }
            }
        }

        Ok(settings)
    }

    /// Whether a branch name is in the protected set (case-insensitive,
    /// surrounding whitespace ignored).
    pub fn is_protected(&self, name: &str) -> bool {
        let candidate = name.trim().to_lowercase();
        self.protected
            .iter()
            .any(|p| p.trim().to_lowercase() == candidate)
    }
}

/// Flatten multi-valued config entries: each value may itself hold several
/// comma-separated names.
fn parse_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parse a git config boolean value.
///
/// Git accepts various boolean representations:
/// - true: `true`, `yes`, `on`, `1`
/// - false: `false`, `no`, `off`, `0`
///
/// Returns the default value if parsing fails.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => default,
    }
}
