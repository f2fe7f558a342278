//! Staged fetcher: skip-if-present, isolated staging, atomic publish.

mod staging;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::error::FetchError;
use crate::locator::ResourceDescriptor;
use crate::storage::{part_path, publish};
use crate::task::{DownloadTask, FetchOutcome};
use crate::transport::{Strategy, TransferRequest, Transport};

use staging::StagingArea;

pub struct StagedFetcher {
    transport: Arc<dyn Transport>,
    staging_dir_name: String,
}

impl StagedFetcher {
    pub fn new(transport: Arc<dyn Transport>, staging_dir_name: impl Into<String>) -> Self {
        Self {
            transport,
            staging_dir_name: staging_dir_name.into(),
        }
    }

    /// Places `descriptor` into the task's destination. Never panics on I/O;
    /// every error becomes a `Failed` outcome.
    pub fn fetch(
        &self,
        task: Arc<DownloadTask>,
        descriptor: &ResourceDescriptor,
        headers: &HashMap<String, String>,
    ) -> FetchOutcome {
        let dest = task.destination_dir();
        let final_path = dest.join(&descriptor.file_name);
        if final_path.exists() {
            tracing::info!(file = %descriptor.file_name, dest = %dest.display(), "already present, skipping");
            return FetchOutcome::skipped(task, descriptor.file_name.clone());
        }

        let started = Instant::now();
        tracing::info!(
            url = %task.source_url(),
            file = %descriptor.file_name,
            dest = %dest.display(),
            platform = %descriptor.platform,
            "fetch started"
        );
        match self.stage_and_publish(dest, &final_path, descriptor, headers) {
            Ok(bytes) => {
                let elapsed = started.elapsed();
                tracing::info!(
                    file = %descriptor.file_name,
                    bytes,
                    secs = elapsed.as_secs_f64(),
                    "published"
                );
                FetchOutcome::completed(task, descriptor.file_name.clone(), bytes, elapsed)
            }
            Err(e) => {
                tracing::error!(
                    url = %task.source_url(),
                    file = %descriptor.file_name,
                    kind = e.kind(),
                    error = %e,
                    "fetch failed"
                );
                FetchOutcome::failed(task, Some(descriptor.file_name.clone()), &e)
            }
        }
    }

    fn stage_and_publish(
        &self,
        dest: &Path,
        final_path: &Path,
        descriptor: &ResourceDescriptor,
        headers: &HashMap<String, String>,
    ) -> Result<u64, FetchError> {
        fs::create_dir_all(dest).map_err(|e| FetchError::filesystem("create", dest, e))?;
        let staging = StagingArea::create(dest, &self.staging_dir_name)
            .map_err(|e| FetchError::filesystem("stage in", &dest.join(&self.staging_dir_name), e))?;
        let staged = staging.path().join(&descriptor.file_name);

        let request = TransferRequest {
            url: &descriptor.download_url,
            headers,
            strategy: Strategy::for_platform(descriptor.platform),
        };
        let result = self
            .transport
            .transfer(&request, &staged)
            .map_err(FetchError::from)
            .and_then(|bytes| {
                publish(&staged, final_path)
                    .map(|()| bytes)
                    .map_err(|e| FetchError::filesystem("publish", final_path, e))
            });

        if result.is_err() {
            let _ = fs::remove_file(part_path(final_path));
        }
        staging.remove();
        result
    }
}
