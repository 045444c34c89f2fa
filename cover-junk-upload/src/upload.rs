use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cover_junk_lib::WorkerPool;

use crate::error::UploadError;
use crate::store::ObjectStore;

/// Default number of concurrent upload tasks.
pub const DEFAULT_WORKERS: usize = 5;

/// Failure reasons longer than this are cut for display.
pub const MAX_REASON_CHARS: usize = 100;

/// How many times to try a single file, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Result of uploading one file, produced by a worker task.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file_name: String,
    pub key: String,
    pub attempts: u32,
    /// Failure reason, truncated to [`MAX_REASON_CHARS`]
    pub result: Result<(), String>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Totals for a batch, reduced from the outcomes by the coordinator.
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<UploadOutcome>,
}

impl UploadSummary {
    pub fn record(&mut self, outcome: UploadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed.push(outcome);
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when every file was uploaded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.succeeded == self.total
    }
}

/// List the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into.
pub fn collect_upload_files(dir: &Path) -> Result<Vec<PathBuf>, UploadError> {
    if !dir.is_dir() {
        return Err(UploadError::missing_source(dir));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(UploadError::empty_source(dir));
    }
    files.sort();
    Ok(files)
}

/// Object key for a file: `prefix/name`, or just `name` for an empty prefix.
pub fn remote_key(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

fn truncate_reason(reason: &str) -> String {
    reason.chars().take(MAX_REASON_CHARS).collect()
}

/// Upload one file, retrying up to the policy's attempt limit.
///
/// Returns the number of attempts made together with the result of the last
/// one. The delay is only slept between attempts.
pub async fn upload_with_retry<S>(
    store: &S,
    key: &str,
    path: &Path,
    policy: &RetryPolicy,
) -> (u32, Result<(), UploadError>)
where
    S: ObjectStore,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match store.put_file(key, path).await {
            Ok(()) => return (attempt, Ok(())),
            Err(e) if attempt >= max_attempts => return (attempt, Err(e)),
            Err(e) => {
                log::debug!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt,
                    max_attempts,
                    key,
                    e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

async fn upload_one<S>(store: &S, prefix: &str, path: PathBuf, policy: &RetryPolicy) -> UploadOutcome
where
    S: ObjectStore,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let key = remote_key(prefix, &file_name);

    let (attempts, result) = upload_with_retry(store, &key, &path, policy).await;
    let result = result.map_err(|e| {
        log::warn!("Giving up on {} after {} attempts: {}", file_name, attempts, e);
        truncate_reason(&e.to_string())
    });

    UploadOutcome {
        file_name,
        key,
        attempts,
        result,
    }
}

/// Upload `files` under `prefix` using `workers` concurrent tasks.
///
/// Files are submitted in the order given. `on_outcome` sees each outcome as
/// it arrives, in completion order.
pub async fn upload_all<S>(
    store: Arc<S>,
    files: Vec<PathBuf>,
    prefix: &str,
    workers: usize,
    policy: RetryPolicy,
    mut on_outcome: impl FnMut(&UploadOutcome),
) -> UploadSummary
where
    S: ObjectStore + 'static,
{
    let mut summary = UploadSummary {
        total: files.len(),
        ..Default::default()
    };
    log::info!(
        "Uploading {} files with {} workers",
        summary.total,
        workers.max(1)
    );

    let prefix = prefix.to_string();
    let mut pool = WorkerPool::start(workers, files, move |path: PathBuf| {
        let store = store.clone();
        let prefix = prefix.clone();
        async move { upload_one(store.as_ref(), &prefix, path, &policy).await }
    });

    while let Some(outcome) = pool.recv().await {
        on_outcome(&outcome);
        summary.record(outcome);
    }

    summary
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
