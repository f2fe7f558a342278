//! Task and outcome types flowing between scheduler, fetcher and report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;
use crate::platform::{Platform, PlatformRouter};

/// One requested unit of work. The destination is already resolved (preset or
/// literal path) and the platform is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    source_url: String,
    destination_dir: PathBuf,
    platform: Platform,
}

impl DownloadTask {
    pub fn new(source_url: impl Into<String>, destination_dir: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            source_url: source_url.into().trim().to_string(),
            destination_dir: destination_dir.into(),
            platform,
        }
    }

    /// Builds a task, tagging it with the router's platform for `source_url`.
    pub fn routed(router: &PlatformRouter, source_url: &str, destination_dir: impl Into<PathBuf>) -> Self {
        let platform = router.detect(source_url);
        Self::new(source_url, destination_dir, platform)
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn destination_dir(&self) -> &std::path::Path {
        &self.destination_dir
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Completed,
    Skipped,
    Failed,
}

/// Result of one fetch. Shares (does not own) its task; immutable once built.
/// `error_detail` is set exactly when the status is `Failed`.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    task: Arc<DownloadTask>,
    status: FetchStatus,
    file_name: Option<String>,
    error_detail: Option<String>,
    elapsed: Option<Duration>,
    bytes: Option<u64>,
}

impl FetchOutcome {
    pub fn completed(task: Arc<DownloadTask>, file_name: String, bytes: u64, elapsed: Duration) -> Self {
        Self {
            task,
            status: FetchStatus::Completed,
            file_name: Some(file_name),
            error_detail: None,
            elapsed: Some(elapsed),
            bytes: Some(bytes),
        }
    }

    pub fn skipped(task: Arc<DownloadTask>, file_name: String) -> Self {
        Self {
            task,
            status: FetchStatus::Skipped,
            file_name: Some(file_name),
            error_detail: None,
            elapsed: None,
            bytes: None,
        }
    }

    pub fn failed(task: Arc<DownloadTask>, file_name: Option<String>, error: &FetchError) -> Self {
        Self {
            task,
            status: FetchStatus::Failed,
            file_name,
            error_detail: Some(error.to_string()),
            elapsed: None,
            bytes: None,
        }
    }

    pub fn task(&self) -> &DownloadTask {
        &self.task
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn bytes(&self) -> Option<u64> {
        self.bytes
    }

    /// Completed or skipped: the file is present at the destination.
    pub fn is_success(&self) -> bool {
        self.status != FetchStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routed_task_carries_platform() {
        let router = PlatformRouter::new();
        let task = DownloadTask::routed(
            &router,
            " https://huggingface.co/a/b/resolve/main/c.bin ",
            "/models",
        );
        assert_eq!(task.platform(), Platform::HubRepository);
        assert_eq!(task.source_url(), "https://huggingface.co/a/b/resolve/main/c.bin");
    }

    #[test]
    fn error_detail_only_on_failure() {
        let task = Arc::new(DownloadTask::new("https://x/y", "/d", Platform::Generic));
        let ok = FetchOutcome::completed(Arc::clone(&task), "y".into(), 10, Duration::from_secs(1));
        assert!(ok.error_detail().is_none());
        assert!(ok.is_success());
        let skip = FetchOutcome::skipped(Arc::clone(&task), "y".into());
        assert!(skip.error_detail().is_none());
        let failed = FetchOutcome::failed(task, None, &FetchError::Interrupted);
        assert_eq!(failed.status(), FetchStatus::Failed);
        assert_eq!(failed.error_detail(), Some("interrupted before start"));
        assert!(!failed.is_success());
    }
}
