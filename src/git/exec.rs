//! Hardened subprocess execution.
//!
//! All git invocations go through [`Git::run`]: arguments are validated,
//! the child environment is reduced to an allow-list, output is captured on
//! reader threads, and a wall-clock deadline bounds the whole call. Standard
//! input stays connected to the parent so credential prompts from remote
//! operations still work.

use crate::git::{validate_git_arg, Git, GitError};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default wall-clock budget for a single git invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Bytes that never belong in parseable git output: NUL, BEL, ESC, CSI.
/// Their presence means corruption or an injection attempt.
const FORBIDDEN_OUTPUT_BYTES: &[u8] = &[0x00, 0x07, 0x1B, 0x9B];

/// Environment variables forwarded to the child. Everything else from the
/// parent environment is dropped before the forced values below are applied.
fn env_allowed(key: &str) -> bool {
    matches!(key, "HOME" | "PATH" | "XDG_CONFIG_HOME" | "TERM")
        || key.starts_with("SSH_")
        || key.starts_with("GIT_")
}

/// Values pinned regardless of the parent environment. Tracing is cleared so
/// diagnostics cannot leak into parsed output, and the locale is pinned so
/// stderr substrings stay recognizable.
const ENV_FORCED: &[(&str, &str)] = &[
    ("GIT_TERMINAL_PROMPT", "1"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_FLUSH", "1"),
    ("GIT_PROTOCOL", "version=2"),
    ("GIT_TRACE", ""),
    ("GIT_TRACE_PACK_ACCESS", ""),
    ("GIT_TRACE_PACKET", ""),
    ("LC_ALL", "C"),
];

impl Git {
    /// Run git with the given arguments and return trimmed stdout.
    ///
    /// Fails with `InvalidArgument` before spawning if any argument is not
    /// allow-listed, with `Timeout` if the call outlives the configured
    /// budget, and with `CommandError` on a non-zero exit (stderr attached).
    pub(crate) fn run(&self, args: &[&str]) -> Result<String, GitError> {
        for arg in args {
            validate_git_arg(arg)?;
        }
        let mut cmd = Command::new(&self.git_path);
        cmd.args(args).current_dir(&self.work_dir);
        scrub_environment(&mut cmd);
        run_command(cmd, &args.join(" "), self.timeout)
    }
}

fn scrub_environment(cmd: &mut Command) {
    cmd.env_clear();
    cmd.envs(std::env::vars().filter(|(key, _)| env_allowed(key)));
    cmd.envs(ENV_FORCED.iter().copied());
}

/// Spawn a prepared command, drain its output on reader threads, and enforce
/// the deadline. Factored out of [`Git::run`] so the timeout behavior can be
/// tested against arbitrary commands.
fn run_command(mut cmd: Command, label: &str, timeout: Duration) -> Result<String, GitError> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| GitError::command(label, format!("failed to spawn: {e}")))?;

    // Drain both pipes on their own threads so a chatty child cannot fill a
    // pipe buffer and deadlock against our wait loop.
    let stdout_reader = child.stdout.take().map(spawn_pipe_reader);
    let stderr_reader = child.stderr.take().map(spawn_pipe_reader);

    let status = wait_with_deadline(&mut child, label, timeout)?;

    let stdout = collect_pipe(stdout_reader);
    let stderr = collect_pipe(stderr_reader);

    if !status.success() {
        return Err(GitError::command(
            label,
            String::from_utf8_lossy(&stderr).into_owned(),
        ));
    }

    if stdout.iter().any(|b| FORBIDDEN_OUTPUT_BYTES.contains(b)) {
        return Err(GitError::command(
            label,
            "output contains control characters",
        ));
    }

    Ok(String::from_utf8_lossy(&stdout).trim().to_string())
}

fn spawn_pipe_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).ok();
        buf
    })
}

fn collect_pipe(reader: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Poll the child until it exits or the deadline passes. The deadline is
/// checked before each poll, so a call that outlives its budget reports
/// `Timeout` even if the child happens to finish while we are killing it.
fn wait_with_deadline(
    child: &mut Child,
    label: &str,
    timeout: Duration,
) -> Result<ExitStatus, GitError> {
    let deadline = Instant::now() + timeout;
    loop {
        let now = Instant::now();
        if now >= deadline {
            child.kill().ok();
            child.wait().ok();
            return Err(GitError::Timeout {
                command: label.to_string(),
                timeout,
            });
        }
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                let remaining = deadline.saturating_duration_since(now);
                thread::sleep(POLL_INTERVAL.min(remaining));
            }
            Err(e) => {
                child.kill().ok();
                return Err(GitError::command(label, format!("wait failed: {e}")));
            }
        }
    }
}
