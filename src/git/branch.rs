use super::{validate_branch_name, Git, GitError};
use crate::settings::Settings;
use std::collections::HashSet;
use url::Url;

/// Field separator for machine-parseable ref listings. Multi-character so a
/// single separator byte inside a field cannot shift columns; the subject is
/// the last field and is parsed with `splitn`, so separators inside it are
/// preserved.
const FIELD_SEPARATOR: &str = ":::";

const LIST_FORMAT: &str = "--format=%(refname:short):::%(objectname:short):::%(upstream:short):::%(HEAD):::%(upstream:track):::%(subject)";

/// Display width for tip commit messages; longer subjects are truncated with
/// an ellipsis.
const MESSAGE_DISPLAY_WIDTH: usize = 30;

/// One branch, local or remote, at a point in time.
///
/// Constructed fresh on every listing, immutable afterwards. Deletion never
/// trusts these flags; it re-derives existence and merge state at the moment
/// it acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Short name with the remote prefix stripped for remote branches.
    pub name: String,
    /// Abbreviated hash of the branch tip.
    pub commit_hash: String,
    /// First line of the tip commit message, truncated for display.
    pub message: String,
    /// Fully qualified ref path.
    pub reference: String,
    /// True iff this is the checked-out branch.
    pub is_current: bool,
    /// True iff this record came from the remote-tracking namespace.
    pub is_remote: bool,
    /// True iff the name is in the protected set.
    pub is_default: bool,
    /// True iff the tip is reachable from the current branch.
    pub is_merged: bool,
    /// True iff the upstream tracking ref reports gone.
    pub is_stale: bool,
    /// True iff the upstream has commits this branch lacks.
    pub is_behind: bool,
    /// Upstream short name, empty when no upstream is configured.
    pub tracking_branch: String,
}

/// Per-branch result of a batch deletion.
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub name: String,
    pub succeeded: bool,
    pub error: Option<GitError>,
}

impl DeletionOutcome {
    pub fn success(name: impl Into<String>) -> Self {
        DeletionOutcome {
            name: name.into(),
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: GitError) -> Self {
        DeletionOutcome {
            name: name.into(),
            succeeded: false,
            error: Some(error),
        }
    }
}

impl Git {
    /// Short name of the checked-out branch (`HEAD` when detached).
    pub fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Enumerate local and remote-tracking branches with their metadata.
    ///
    /// Local branches come first, then branches on the configured remote with
    /// the remote prefix stripped from their display names. Candidates whose
    /// names fail validation are skipped rather than failing the listing, and
    /// duplicates within one `(name, is_remote)` pair are dropped.
    pub fn list_branches(&self) -> Result<Vec<Branch>, GitError> {
        let current = match self.current_branch() {
            Ok(name) => name,
            // A repository with no commits has no branches yet.
            Err(GitError::CommandError { ref stderr, .. }) if is_unborn_head(stderr) => {
                return Ok(Vec::new())
            }
            Err(other) => return Err(other),
        };

        let merged = self.merged_set(&current)?;
        let remote = &self.settings.remote;

        let mut branches = Vec::new();
        let mut seen: HashSet<(String, bool)> = HashSet::new();

        let local_refs = self.run(&["for-each-ref", LIST_FORMAT, "refs/heads"])?;
        for line in local_refs.lines() {
            if let Some(branch) = parse_branch_line(line, false, remote, &merged, &self.settings) {
                if seen.insert((branch.name.clone(), branch.is_remote)) {
                    branches.push(branch);
                }
            }
        }

        let remote_pattern = format!("refs/remotes/{remote}");
        let remote_refs = self.run(&["for-each-ref", LIST_FORMAT, &remote_pattern])?;
        for line in remote_refs.lines() {
            if let Some(branch) = parse_branch_line(line, true, remote, &merged, &self.settings) {
                if seen.insert((branch.name.clone(), branch.is_remote)) {
                    branches.push(branch);
                }
            }
        }

        Ok(branches)
    }

    /// Delete one branch, locally or on the configured remote.
    ///
    /// Checks run in a fixed order: name validation, protection, existence,
    /// then merge state (local, non-forced only). Protection is checked
    /// before any subprocess runs and `force` never overrides it. In dry-run
    /// mode every check still runs; only the mutating call is skipped.
    pub fn delete_branch(&self, name: &str, force: bool, remote: bool) -> Result<(), GitError> {
        validate_branch_name(name)?;

        if self.settings.is_protected(name) {
            return Err(GitError::ProtectedBranch(name.to_string()));
        }

        let exists = if remote {
            self.remote_branch_exists(name)?
        } else {
            self.local_branch_exists(name)?
        };
        if !exists {
            return Err(GitError::NotFound(name.to_string()));
        }

        if !remote && !force && !self.is_merged(name)? {
            return Err(GitError::UnmergedBranch(name.to_string()));
        }

        if self.settings.dry_run {
            return Ok(());
        }

        if remote {
            self.run(&["push", &self.settings.remote, "--delete", name])
                .map_err(|e| self.classify_remote_failure(e))?;
        } else {
            let delete_flag = if force { "-D" } else { "-d" };
            self.run(&["branch", delete_flag, name])?;
        }

        Ok(())
    }

    /// Whether a local branch exists, via a targeted ref probe.
    pub fn local_branch_exists(&self, name: &str) -> Result<bool, GitError> {
        validate_branch_name(name)?;
        let reference = format!("refs/heads/{name}");
        match self.run(&["show-ref", "--verify", "--quiet", &reference]) {
            Ok(_) => Ok(true),
            // show-ref exits non-zero when the ref is missing.
            Err(GitError::CommandError { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Whether a branch exists on the configured remote. This contacts the
    /// remote, so it is subject to the invocation timeout.
    pub fn remote_branch_exists(&self, name: &str) -> Result<bool, GitError> {
        validate_branch_name(name)?;
        let output = self.run(&["ls-remote", "--heads", &self.settings.remote, name])?;
        Ok(!output.is_empty())
    }

    /// Whether a branch is merged into the current branch.
    pub fn is_merged(&self, name: &str) -> Result<bool, GitError> {
        let current = self.current_branch()?;
        Ok(self.merged_set(&current)?.contains(name))
    }

    /// Names of all branches (local and remote-tracking) merged into `basis`,
    /// as short refs.
    fn merged_set(&self, basis: &str) -> Result<HashSet<String>, GitError> {
        let output = self.run(&[
            "branch",
            "--all",
            "--merged",
            basis,
            "--format=%(refname:short)",
        ])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty() && !is_head_pointer(name))
            .map(String::from)
            .collect())
    }

    /// Create a branch at the current HEAD and switch to it.
    pub fn create_branch(&self, name: &str) -> Result<(), GitError> {
        validate_branch_name(name)?;
        self.run(&["checkout", "--quiet", "-b", name])?;
        Ok(())
    }

    /// Record an empty commit. The message must survive argument validation,
    /// so callers pass a single hyphenated token.
    pub fn commit_empty(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "--quiet", "--allow-empty", "-m", message])?;
        Ok(())
    }

    /// Push a branch to the configured remote and set its upstream.
    pub fn push_branch(&self, name: &str) -> Result<(), GitError> {
        validate_branch_name(name)?;
        self.run(&["push", "--quiet", "-u", &self.settings.remote, name])?;
        Ok(())
    }

    /// Switch to an existing branch.
    pub fn checkout(&self, name: &str) -> Result<(), GitError> {
        validate_branch_name(name)?;
        self.run(&["checkout", "--quiet", name])?;
        Ok(())
    }

    /// Translate a failed remote deletion into an actionable error. This is
    /// the single place stderr text is inspected; other layers pass
    /// `CommandError` through untouched.
    fn classify_remote_failure(&self, error: GitError) -> GitError {
        let (command, stderr) = match error {
            GitError::CommandError { command, stderr } => (command, stderr),
            other => return other,
        };

        if stderr.contains("could not read Username") || stderr.contains("Authentication failed") {
            return GitError::AuthenticationFailed(self.auth_advice());
        }
        if stderr.contains("Permission denied") {
            return GitError::AuthenticationFailed(format!(
                "permission denied by '{}'; {}",
                self.settings.remote,
                self.auth_advice()
            ));
        }
        if stderr.contains("remote rejected") {
            return GitError::command(
                command,
                format!("{stderr} (the branch may be protected on the server)"),
            );
        }

        GitError::CommandError { command, stderr }
    }

    /// Remediation advice keyed to the remote's URL scheme.
    fn auth_advice(&self) -> String {
        let url = self
            .run(&["remote", "get-url", &self.settings.remote])
            .unwrap_or_default();
        remote_auth_advice(&url)
    }
}

/// Pick credential advice from the remote URL. HTTPS remotes want a
/// credential helper, SSH remotes an agent with a loaded key. The scp-style
/// `user@host:path` form parses as no scheme at all, hence the fallback
/// check.
fn remote_auth_advice(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        match parsed.scheme() {
            "http" | "https" => {
                return "configure a credential helper, e.g. \
                        `git config --global credential.helper store`"
                    .to_string()
            }
            "ssh" | "git" => {
                return "check that your SSH agent is running and has a key loaded (`ssh-add -l`)"
                    .to_string()
            }
            _ => {}
        }
    }
    if url.contains('@') && url.contains(':') {
        return "check that your SSH agent is running and has a key loaded (`ssh-add -l`)"
            .to_string();
    }
    "verify your credentials for the remote".to_string()
}

fn is_unborn_head(stderr: &str) -> bool {
    stderr.contains("unknown revision") || stderr.contains("ambiguous argument 'HEAD'")
}

fn is_head_pointer(short_name: &str) -> bool {
    short_name == "HEAD" || short_name.ends_with("/HEAD")
}

/// Parse one line of the ref listing. Returns `None` for blank lines,
/// symbolic HEAD pointers, and names that fail validation.
fn parse_branch_line(
    line: &str,
    is_remote: bool,
    remote: &str,
    merged: &HashSet<String>,
    settings: &Settings,
) -> Option<Branch> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.splitn(6, FIELD_SEPARATOR);
    let ref_short = fields.next()?.trim();
    let commit_hash = fields.next().unwrap_or("").trim();
    let upstream = fields.next().unwrap_or("").trim();
    let head_marker = fields.next().unwrap_or("").trim();
    let track = fields.next().unwrap_or("").trim();
    let subject = fields.next().unwrap_or("").trim();

    if ref_short.is_empty() || is_head_pointer(ref_short) {
        return None;
    }

    let (name, reference) = if is_remote {
        let stripped = ref_short
            .strip_prefix(remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(ref_short);
        (stripped.to_string(), format!("refs/remotes/{ref_short}"))
    } else {
        (ref_short.to_string(), format!("refs/heads/{ref_short}"))
    };

    // One malformed ref must not break listing all the others.
    if validate_branch_name(&name).is_err() {
        return None;
    }

    // The merged set holds short refs, so remote branches are looked up under
    // their remote-qualified name.
    let is_merged = if is_remote {
        merged.contains(ref_short)
    } else {
        merged.contains(&name)
    };

    // An empty track field means no upstream or staleness unknown; both read
    // as not stale and not behind.
    let is_stale = track.contains("gone");
    let is_behind = track.contains("behind");

    Some(Branch {
        is_current: !is_remote && head_marker == "*",
        is_remote,
        is_default: settings.is_protected(&name),
        is_merged,
        is_stale,
        is_behind,
        name,
        commit_hash: commit_hash.to_string(),
        message: truncate_subject(subject),
        reference,
        tracking_branch: upstream.to_string(),
    })
}

fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() <= MESSAGE_DISPLAY_WIDTH {
        return subject.to_string();
    }
    let head: String = subject.chars().take(MESSAGE_DISPLAY_WIDTH - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_settings() -> Settings {
        Settings::default()
    }

    fn merged_with(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_local_branch_line() {
        let merged = merged_with(&["feature/a"]);
        let line = "feature/a:::abc1234:::origin/feature/a::: :::[behind 2]:::Add login form";
        let branch =
            parse_branch_line(line, false, "origin", &merged, &default_settings()).unwrap();

        assert_eq!(branch.name, "feature/a");
        assert_eq!(branch.commit_hash, "abc1234");
        assert_eq!(branch.tracking_branch, "origin/feature/a");
        assert_eq!(branch.reference, "refs/heads/feature/a");
        assert_eq!(branch.message, "Add login form");
        assert!(!branch.is_current);
        assert!(!branch.is_remote);
        assert!(branch.is_merged);
        assert!(branch.is_behind);
        assert!(!branch.is_stale);
    }

    #[test]
    fn test_parse_current_branch_marker() {
        let merged = merged_with(&["main"]);
        let line = "main:::abc1234:::origin/main:::*::::::Initial commit";
        let branch = parse_branch_line(line, false, "origin", &merged, &default_settings()).unwrap();

        assert!(branch.is_current);
        assert!(branch.is_default);
        assert!(branch.is_merged);
    }

    #[test]
    fn test_parse_remote_branch_strips_prefix() {
        let merged = merged_with(&["origin/feature/a"]);
        let line = "origin/feature/a:::abc1234::::::::::::Add login form";
        let branch = parse_branch_line(line, true, "origin", &merged, &default_settings()).unwrap();

        assert_eq!(branch.name, "feature/a");
        assert!(branch.is_remote);
        assert!(branch.is_merged);
        assert_eq!(branch.reference, "refs/remotes/origin/feature/a");
        assert!(branch.tracking_branch.is_empty());
    }

    #[test]
    fn test_parse_skips_head_pointer_and_blank_lines() {
        let merged = HashSet::new();
        let settings = default_settings();
        assert!(parse_branch_line("", false, "origin", &merged, &settings).is_none());
        assert!(parse_branch_line(
            "origin/HEAD:::abc1234::::::::::::",
            true,
            "origin",
            &merged,
            &settings
        )
        .is_none());
    }

    #[test]
    fn test_parse_skips_invalid_names() {
        let merged = HashSet::new();
        let line = "bad name:::abc1234::::::::::::subject";
        assert!(parse_branch_line(line, false, "origin", &merged, &default_settings()).is_none());
    }

    #[test]
    fn test_parse_stale_branch() {
        let merged = HashSet::new();
        let line = "old-work:::abc1234:::origin/old-work::: :::[gone]:::WIP";
        let branch = parse_branch_line(line, false, "origin", &merged, &default_settings()).unwrap();
        assert!(branch.is_stale);
        assert!(!branch.is_behind);
        assert!(!branch.is_merged);
    }

    #[test]
    fn test_parse_separator_inside_subject_survives() {
        let merged = HashSet::new();
        let line = "feature/a:::abc1234::::::::::::fix ::: handle colons";
        let branch = parse_branch_line(line, false, "origin", &merged, &default_settings()).unwrap();
        assert_eq!(branch.message, "fix ::: handle colons");
    }

    #[test]
    fn test_truncate_subject_limits_width() {
        let long = "This commit message is definitely longer than thirty characters";
        let truncated = truncate_subject(long);
        assert_eq!(truncated.chars().count(), MESSAGE_DISPLAY_WIDTH);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with("This commit message is defi"));
    }

    #[test]
    fn test_truncate_subject_keeps_short_messages() {
        assert_eq!(truncate_subject("short"), "short");
        let exactly_thirty = "a".repeat(30);
        assert_eq!(truncate_subject(&exactly_thirty), exactly_thirty);
    }

    #[test]
    fn test_truncate_subject_is_char_safe() {
        let accented = "é".repeat(40);
        let truncated = truncate_subject(&accented);
        assert_eq!(truncated.chars().count(), MESSAGE_DISPLAY_WIDTH);
    }

    #[test]
    fn test_auth_advice_for_https_remote() {
        let advice = remote_auth_advice("https://github.com/acme/widgets.git");
        assert!(advice.contains("credential helper"));
    }

    #[test]
    fn test_auth_advice_for_ssh_remote() {
        let advice = remote_auth_advice("ssh://git@github.com/acme/widgets.git");
        assert!(advice.contains("SSH agent"));
    }

    #[test]
    fn test_auth_advice_for_scp_style_remote() {
        let advice = remote_auth_advice("git@github.com:acme/widgets.git");
        assert!(advice.contains("SSH agent"));
    }

    #[test]
    fn test_auth_advice_fallback() {
        let advice = remote_auth_advice("/srv/repos/widgets.git");
        assert!(advice.contains("credentials"));
    }

    #[test]
    fn test_deletion_outcome_constructors() {
        let ok = DeletionOutcome::success("feature/a");
        assert!(ok.succeeded);
        assert!(ok.error.is_none());

        let failed = DeletionOutcome::failure("feature/b", GitError::NotFound("feature/b".into()));
        assert!(!failed.succeeded);
        assert!(matches!(failed.error, Some(GitError::NotFound(_))));
    }
}
