use crate::settings::Settings;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod batch;
mod branch;
mod config;
mod error;
mod exec;
mod validate;

pub use batch::{delete_all, delete_chunked, CHUNK_SIZE, MAX_WORKERS};
pub use branch::{Branch, DeletionOutcome};
pub use error::GitError;
pub use exec::DEFAULT_TIMEOUT;
pub use validate::{
    sanitize_branch_name, validate_branch_name, validate_git_arg, MAX_BRANCH_NAME_LENGTH,
};

/// Handle on one git repository, backed by the `git` executable.
///
/// Carries the resolved binary path, the working directory every subprocess
/// runs in, the per-call timeout, and the loaded settings. Immutable after
/// construction; the builders consume and return `self`. Cloning is cheap
/// and gives worker threads their own handle.
#[derive(Debug, Clone)]
pub struct Git {
    pub(crate) work_dir: PathBuf,
    pub(crate) git_path: PathBuf,
    pub(crate) timeout: Duration,
    pub(crate) settings: Settings,
}

impl Git {
    /// Open the repository containing `dir`.
    ///
    /// Resolves the `git` binary from PATH and verifies that `dir` is inside
    /// a repository (bare repositories count).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, GitError> {
        let dir = dir.as_ref();
        let git_path = which::which("git")
            .map_err(|_| GitError::command("git", "git executable not found in PATH"))?;

        let git = Git {
            work_dir: dir.to_path_buf(),
            git_path,
            timeout: DEFAULT_TIMEOUT,
            settings: Settings::default(),
        };

        match git.run(&["rev-parse", "--git-dir"]) {
            Ok(_) => Ok(git),
            Err(GitError::CommandError { .. }) => Err(GitError::NotARepository(dir.to_path_buf())),
            Err(other) => Err(other),
        }
    }

    /// Replace the settings and adopt their timeout.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.timeout = settings.timeout;
        self.settings = settings;
        self
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let status = Command::new("git")
            .args(["init", "--quiet"])
            .current_dir(dir.path())
            .status()
            .unwrap();
        assert!(status.success());
        dir
    }

    #[test]
    fn test_open_rejects_non_repository() {
        let dir = TempDir::new().unwrap();
        match Git::open(dir.path()) {
            Err(GitError::NotARepository(path)) => assert_eq!(path, dir.path()),
            other => panic!("expected NotARepository, got {other:?}"),
        }
    }

    #[test]
    fn test_open_accepts_fresh_repository() {
        let dir = init_repo();
        let git = Git::open(dir.path()).unwrap();
        assert_eq!(git.work_dir(), dir.path());
        assert_eq!(git.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_with_timeout_overrides_default() {
        let dir = init_repo();
        let git = Git::open(dir.path())
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(git.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_with_settings_adopts_settings_timeout() {
        let dir = init_repo();
        let settings = Settings {
            timeout: Duration::from_secs(7),
            ..Settings::default()
        };
        let git = Git::open(dir.path()).unwrap().with_settings(settings);
        assert_eq!(git.timeout, Duration::from_secs(7));
        assert_eq!(git.settings().timeout, Duration::from_secs(7));
    }
}
