use super::{Git, GitError};

impl Git {
    /// Get a config value, respecting git's local + global layering.
    ///
    /// An absent key reads as `None`. So does a failed read, which keeps
    /// settings loading on the defaults path instead of aborting the command.
    pub(crate) fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        match self.run(&["config", "--get", key]) {
            Ok(value) => Ok(Some(value)),
            Err(GitError::CommandError { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Get every value of a multi-valued config key.
    pub(crate) fn config_get_all(&self, key: &str) -> Result<Vec<String>, GitError> {
        match self.run(&["config", "--get-all", key]) {
            Ok(output) => Ok(output
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect()),
            Err(GitError::CommandError { .. }) => Ok(Vec::new()),
            Err(other) => Err(other),
        }
    }
}
