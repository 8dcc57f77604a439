//! Validation of branch names and git arguments.
//!
//! Every string that reaches the subprocess layer goes through one of these
//! checks first. Branch names are user input and get the strict treatment;
//! subcommands, flags, and ref paths are tool-generated and pass via a fixed
//! allow-list.

use crate::git::GitError;
use regex::Regex;
use std::sync::OnceLock;

/// Longest branch name we accept. Git itself allows longer refs, but nothing
/// legitimate approaches this.
pub const MAX_BRANCH_NAME_LENGTH: usize = 255;

/// Subcommands this tool is allowed to invoke.
const ALLOWED_SUBCOMMANDS: &[&str] = &[
    "branch",
    "checkout",
    "commit",
    "config",
    "for-each-ref",
    "ls-remote",
    "push",
    "remote",
    "rev-parse",
    "show-ref",
];

/// Flags and literal operands this tool passes to git. Anything not listed
/// here (and not a format string or ref path) is validated as a branch name.
const ALLOWED_ARGUMENTS: &[&str] = &[
    "-a",
    "-b",
    "-d",
    "-D",
    "-m",
    "-r",
    "-u",
    "--abbrev-ref",
    "--all",
    "--allow-empty",
    "--delete",
    "--force",
    "--get",
    "--get-all",
    "--git-dir",
    "--heads",
    "--merged",
    "--no-merged",
    "--porcelain",
    "--quiet",
    "--remotes",
    "--short",
    "--verify",
    "get-url",
    "origin",
    "HEAD",
    "refs/heads",
    "refs/remotes",
];

/// Substrings that must never appear in a branch name. Each one is either a
/// shell metacharacter or a git-reserved sequence.
const DANGEROUS_PATTERNS: &[&str] = &[
    ";", "&", "|", "`", "$", "(", ")", "<", ">", "\\", "'", "\"", "\n", "\r", "\t", "..", "@{",
];

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9/_-]*[a-zA-Z0-9])?$").expect("valid regex")
    })
}

fn invalid_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9/_-]").expect("valid regex"))
}

/// Check that a branch name is safe to hand to git.
///
/// Rejections carry the specific reason so the user sees what to fix rather
/// than a generic refusal.
pub fn validate_branch_name(name: &str) -> Result<(), GitError> {
    if name.is_empty() {
        return Err(GitError::invalid_name(name, "cannot be empty"));
    }
    if name.len() > MAX_BRANCH_NAME_LENGTH {
        return Err(GitError::invalid_name(
            name,
            format!("exceeds {MAX_BRANCH_NAME_LENGTH} characters"),
        ));
    }
    if name.starts_with('.') {
        return Err(GitError::invalid_name(name, "cannot start with '.'"));
    }
    if name.ends_with('/') || name.ends_with('.') {
        return Err(GitError::invalid_name(
            name,
            "cannot end with '/' or '.'",
        ));
    }
    if name.ends_with(".lock") {
        return Err(GitError::invalid_name(name, "cannot end with '.lock'"));
    }
    if name.contains("//") {
        return Err(GitError::invalid_name(name, "contains '//'"));
    }
    if name.chars().any(|c| c.is_whitespace()) {
        return Err(GitError::invalid_name(name, "contains whitespace"));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(GitError::invalid_name(name, "contains control characters"));
    }
    for pattern in DANGEROUS_PATTERNS {
        if name.contains(pattern) {
            return Err(GitError::invalid_name(
                name,
                format!("contains dangerous pattern: {}", pattern.escape_default()),
            ));
        }
    }
    if !name_pattern().is_match(name) {
        return Err(GitError::invalid_name(
            name,
            "must start and end with an alphanumeric character and contain \
             only alphanumerics, '-', '_', and '/'",
        ));
    }
    Ok(())
}

/// Check a single git argument before it is passed to the executor.
///
/// Subcommands, allow-listed flags, format strings, and ref paths pass as-is;
/// anything else must survive branch-name validation.
pub fn validate_git_arg(arg: &str) -> Result<(), GitError> {
    if arg.is_empty() {
        return Ok(());
    }
    if ALLOWED_SUBCOMMANDS.contains(&arg) || ALLOWED_ARGUMENTS.contains(&arg) {
        return Ok(());
    }
    // Format specifiers are assembled from literals in this crate, never from
    // user input.
    if arg.starts_with("--format=") || arg.starts_with("%(") {
        return Ok(());
    }
    if let Some(rest) = arg.strip_prefix("refs/") {
        return validate_branch_name(rest).map_err(|_| GitError::InvalidArgument(arg.to_string()));
    }
    if is_config_key(arg) {
        return Ok(());
    }
    validate_branch_name(arg).map_err(|_| GitError::InvalidArgument(arg.to_string()))
}

/// Config keys are compile-time constants in this crate, all under the
/// `branch-delete.` section, but the executor validates them like every other
/// argument.
fn is_config_key(arg: &str) -> bool {
    arg.strip_prefix("branch-delete.").is_some_and(|key| {
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Best-effort cleanup for generated branch names. Replaces disallowed
/// characters with dashes and trims separators from the ends.
///
/// This is for synthesizing safe names (the seed command), never a substitute
/// for `validate_branch_name` before a destructive operation.
pub fn sanitize_branch_name(name: &str) -> String {
    let mut cleaned = invalid_chars().replace_all(name, "-").into_owned();
    while cleaned.contains("//") {
        cleaned = cleaned.replace("//", "/");
    }
    let cleaned = cleaned.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let mut result = cleaned.to_string();
    result.truncate(MAX_BRANCH_NAME_LENGTH);
    result
}
