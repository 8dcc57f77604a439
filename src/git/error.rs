//! Typed errors for branch operations.
//!
//! Every failure a branch operation can produce is one of these variants, so
//! callers match on the enum instead of parsing message strings. Commands
//! wrap them in `anyhow` at the CLI boundary.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("invalid branch name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid git argument: '{0}'")]
    InvalidArgument(String),

    #[error("refusing to delete protected branch '{0}'")]
    ProtectedBranch(String),

    #[error("branch '{0}' not found")]
    NotFound(String),

    #[error("branch '{0}' is not fully merged (use --force to delete anyway)")]
    UnmergedBranch(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("git {command} failed: {stderr}")]
    CommandError { command: String, stderr: String },

    #[error("git {command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("deadline exceeded before the operation could start")]
    DeadlineExceeded,
}

impl GitError {
    /// True when the branch simply was not there. Deleting an already-deleted
    /// branch reports this, which batch callers treat as ignorable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitError::NotFound(_))
    }

    /// True for failures caused by the time budget rather than git itself.
    pub fn is_deadline(&self) -> bool {
        matches!(
            self,
            GitError::Timeout { .. } | GitError::DeadlineExceeded
        )
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GitError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn command(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        GitError::CommandError {
            command: command.into(),
            stderr: stderr.into().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GitError::ProtectedBranch("main".to_string());
        assert_eq!(
            err.to_string(),
            "refusing to delete protected branch 'main'"
        );

        let err = GitError::NotFound("gone".to_string());
        assert_eq!(err.to_string(), "branch 'gone' not found");

        let err = GitError::invalid_name("bad name", "contains whitespace");
        assert_eq!(
            err.to_string(),
            "invalid branch name 'bad name': contains whitespace"
        );
    }

    #[test]
    fn test_timeout_includes_duration() {
        let err = GitError::Timeout {
            command: "branch".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "git branch timed out after 30s");
    }

    #[test]
    fn test_command_error_trims_stderr() {
        let err = GitError::command("push", "fatal: remote error\n");
        assert_eq!(err.to_string(), "git push failed: fatal: remote error");
    }

    #[test]
    fn test_is_not_found() {
        assert!(GitError::NotFound("x".to_string()).is_not_found());
        assert!(!GitError::DeadlineExceeded.is_not_found());
    }

    #[test]
    fn test_is_deadline() {
        assert!(GitError::DeadlineExceeded.is_deadline());
        assert!(GitError::Timeout {
            command: "push".to_string(),
            timeout: Duration::from_millis(1),
        }
        .is_deadline());
        assert!(!GitError::NotFound("x".to_string()).is_deadline());
    }
}
