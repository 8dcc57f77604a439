//! Concurrent batch deletion.
//!
//! Two modes with deliberately different semantics: [`delete_chunked`] fails
//! fast and reports the first error, [`delete_all`] gives every branch an
//! attempt and collects per-branch outcomes. Both take a hard wall-clock
//! deadline: no branch operation starts after it passes, and results that
//! arrive late are discarded rather than reported.

use super::{Branch, DeletionOutcome, GitError};
use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Branches processed sequentially per concurrent chunk in fail-fast mode.
pub const CHUNK_SIZE: usize = 10;

/// Worker pool size for outcome-collecting mode.
pub const MAX_WORKERS: usize = 4;

/// Apply `op` to every branch, failing fast on the first error.
///
/// Branches are partitioned into chunks of [`CHUNK_SIZE`]; each chunk runs on
/// its own thread and processes its branches strictly in order. The first
/// error wins; in-flight chunks are not cancelled but their results are
/// discarded. Completion order across chunks is unspecified.
pub fn delete_chunked<F>(branches: &[Branch], deadline: Instant, op: F) -> Result<(), GitError>
where
    F: Fn(&Branch) -> Result<(), GitError> + Send + Sync + 'static,
{
    if branches.is_empty() {
        return Ok(());
    }
    if Instant::now() >= deadline {
        return Err(GitError::DeadlineExceeded);
    }

    let op = Arc::new(op);
    let (tx, rx) = mpsc::channel::<Result<(), GitError>>();
    let mut chunk_count = 0;

    for chunk in branches.chunks(CHUNK_SIZE) {
        chunk_count += 1;
        let chunk: Vec<Branch> = chunk.to_vec();
        let op = Arc::clone(&op);
        let tx = tx.clone();
        thread::spawn(move || {
            for branch in &chunk {
                if Instant::now() >= deadline {
                    let _ = tx.send(Err(GitError::DeadlineExceeded));
                    return;
                }
                if let Err(e) = op(branch) {
                    let _ = tx.send(Err(e));
                    return;
                }
            }
            let _ = tx.send(Ok(()));
        });
    }
    drop(tx);

    let mut finished = 0;
    while finished < chunk_count {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Ok(())) => finished += 1,
            Ok(Err(e)) => return Err(e),
            Err(RecvTimeoutError::Timeout) => return Err(GitError::DeadlineExceeded),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(GitError::command("batch", "worker thread panicked"))
            }
        }
    }
    Ok(())
}

/// Apply `op` to every branch and collect an outcome per attempted branch.
///
/// A fixed pool of [`MAX_WORKERS`] workers pulls from a shared queue so that
/// partial success stays visible. Branches not attempted before the deadline
/// have no outcome; callers detect incompleteness by comparing the outcome
/// count to the branch count. Arrival order is unspecified.
pub fn delete_all<F>(branches: &[Branch], deadline: Instant, op: F) -> Vec<DeletionOutcome>
where
    F: Fn(&Branch) -> Result<(), GitError> + Send + Sync + 'static,
{
    if branches.is_empty() || Instant::now() >= deadline {
        return Vec::new();
    }

    let op = Arc::new(op);
    let queue: Arc<Mutex<VecDeque<Branch>>> =
        Arc::new(Mutex::new(branches.iter().cloned().collect()));
    let (tx, rx) = mpsc::channel::<DeletionOutcome>();

    let workers = MAX_WORKERS.min(branches.len());
    for _ in 0..workers {
        let op = Arc::clone(&op);
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        thread::spawn(move || loop {
            if Instant::now() >= deadline {
                return;
            }
            let branch = match queue.lock() {
                Ok(mut q) => q.pop_front(),
                // Another worker panicked while holding the lock; stop.
                Err(_) => None,
            };
            let Some(branch) = branch else { return };

            let outcome = match op(&branch) {
                Ok(()) => DeletionOutcome::success(branch.name.clone()),
                Err(e) => DeletionOutcome::failure(branch.name.clone(), e),
            };
            if tx.send(outcome).is_err() {
                return;
            }
        });
    }
    drop(tx);

    let mut outcomes = Vec::with_capacity(branches.len());
    while outcomes.len() < branches.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(outcome) => outcomes.push(outcome),
            // Deadline passed or every worker exited; whatever is missing
            // simply was not attempted in time.
            Err(_) => break,
        }
    }
    outcomes
}
