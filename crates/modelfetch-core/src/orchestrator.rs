//! Wires routing, location, staged fetching and batch scheduling together.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetcher::StagedFetcher;
use crate::locator::{ResourceDescriptor, ResourceLocator};
use crate::platform::PlatformRouter;
use crate::report::BatchReport;
use crate::scheduler::{self, Interrupt};
use crate::task::{DownloadTask, FetchOutcome};
use crate::transport::HttpTransport;

/// Entry point for callers. Built once from an explicit [`FetchConfig`]; no
/// credential or option is read from process-wide state afterwards.
pub struct Orchestrator {
    router: PlatformRouter,
    locator: ResourceLocator,
    fetcher: StagedFetcher,
    jobs: usize,
}

impl Orchestrator {
    pub fn new(cfg: &FetchConfig) -> Self {
        let router = PlatformRouter::new().with_extra_hosts(&cfg.hosts.hub, &cfg.hosts.community);
        let locator = ResourceLocator::with_curl(cfg.tokens.clone());
        let fetcher = StagedFetcher::new(Arc::new(HttpTransport::from_config(cfg)), cfg.staging_dir_name.clone());
        Self::from_parts(router, locator, fetcher, cfg.jobs)
    }

    pub fn from_parts(router: PlatformRouter, locator: ResourceLocator, fetcher: StagedFetcher, jobs: usize) -> Self {
        Self {
            router,
            locator,
            fetcher,
            jobs: jobs.max(1),
        }
    }

    pub fn router(&self) -> &PlatformRouter {
        &self.router
    }

    /// Routed task for `url` into an already resolved destination.
    pub fn task(&self, url: &str, destination_dir: impl Into<PathBuf>) -> DownloadTask {
        DownloadTask::routed(&self.router, url, destination_dir)
    }

    /// Routes and locates `url` without transferring anything. May probe the
    /// network for community names.
    pub fn describe(&self, url: &str) -> Result<ResourceDescriptor, FetchError> {
        self.locator.locate(url, self.router.detect(url))
    }

    /// Locates and fetches one task. Blocking.
    pub fn run_task(&self, task: Arc<DownloadTask>) -> FetchOutcome {
        let descriptor = match self.locator.locate(task.source_url(), task.platform()) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(url = %task.source_url(), kind = e.kind(), error = %e, "cannot locate resource");
                return FetchOutcome::failed(task, None, &e);
            }
        };
        let headers = self.locator.headers_for(descriptor.platform);
        self.fetcher.fetch(task, &descriptor, &headers)
    }

    /// Runs every `(url, destination)` pair with at most `jobs` in flight
    /// (configured default when `None`).
    pub async fn run_batch(
        self: &Arc<Self>,
        pairs: Vec<(String, PathBuf)>,
        jobs: Option<usize>,
        interrupt: Option<Arc<Interrupt>>,
    ) -> BatchReport {
        let tasks = pairs
            .into_iter()
            .map(|(url, dest)| self.task(&url, dest))
            .collect();
        let this = Arc::clone(self);
        let fetch = Arc::new(move |task: Arc<DownloadTask>| this.run_task(task));
        scheduler::run_batch(tasks, jobs.unwrap_or(self.jobs), interrupt, fetch).await
    }

    /// Single-task entry point: true when the file is present afterwards.
    pub async fn fetch_one(self: &Arc<Self>, url: &str, destination_dir: impl Into<PathBuf>) -> bool {
        let report = self
            .run_batch(vec![(url.to_string(), destination_dir.into())], Some(1), None)
            .await;
        report.total() == 1 && !report.has_failures()
    }
}
