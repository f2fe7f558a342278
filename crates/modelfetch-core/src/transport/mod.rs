//! Transfer strategies behind a single [`Transport`] seam.
//!
//! Hub files use a resumable chunked pull; community and generic URLs use a
//! segmented multi-connection pull. The staged fetcher only sees the trait,
//! so tests can substitute instrumented transports.

mod chunked;
mod segment;
mod segmented;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::platform::Platform;
use crate::retry::{RetryPolicy, TransferError};
use crate::scheduler::GlobalConnectionBudget;

pub use chunked::download_chunked;
pub use segmented::download_segmented;

/// How a file is pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Sequential GET that resumes from the written length on retry.
    Chunked,
    /// Parallel range GETs into a preallocated file.
    Segmented,
}

impl Strategy {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::HubRepository => Strategy::Chunked,
            Platform::CommunitySite | Platform::Generic => Strategy::Segmented,
        }
    }
}

/// Everything a transport needs for one file.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub url: &'a str,
    pub headers: &'a HashMap<String, String>,
    pub strategy: Strategy,
}

/// Pulls one remote file into `staged_path`, returning the byte count.
pub trait Transport: Send + Sync {
    fn transfer(&self, request: &TransferRequest<'_>, staged_path: &Path) -> Result<u64, TransferError>;
}

/// Per-connection curl tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlOptions {
    pub max_recv_speed: Option<u64>,
}

impl CurlOptions {
    /// Common options for every transfer connection: redirects, timeouts,
    /// low-speed abort and the optional receive cap.
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        // Abort when throughput stays under 1 KiB/s for a minute.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(Duration::from_secs(6 * 3600))?;
        if let Some(speed) = self.max_recv_speed {
            easy.max_recv_speed(speed)?;
        }
        Ok(())
    }
}

/// libcurl-backed transport shared by all workers.
pub struct HttpTransport {
    segments_per_file: usize,
    retry: RetryPolicy,
    curl: CurlOptions,
    budget: Arc<GlobalConnectionBudget>,
}

impl HttpTransport {
    pub fn new(
        segments_per_file: usize,
        retry: RetryPolicy,
        curl: CurlOptions,
        budget: Arc<GlobalConnectionBudget>,
    ) -> Self {
        Self {
            segments_per_file: segments_per_file.max(1),
            retry,
            curl,
            budget,
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(
            cfg.segments_per_file,
            cfg.retry_policy(),
            CurlOptions {
                max_recv_speed: cfg.max_bytes_per_sec,
            },
            Arc::new(GlobalConnectionBudget::new(cfg.max_total_connections)),
        )
    }
}

impl Transport for HttpTransport {
    fn transfer(&self, request: &TransferRequest<'_>, staged_path: &Path) -> Result<u64, TransferError> {
        match request.strategy {
            Strategy::Chunked => {
                let _slot = self.budget.reserve_guard(1);
                download_chunked(request.url, request.headers, staged_path, &self.retry, self.curl)
            }
            Strategy::Segmented => download_segmented(
                request.url,
                request.headers,
                staged_path,
                self.segments_per_file,
                &self.retry,
                self.curl,
                &self.budget,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_per_platform() {
        assert_eq!(Strategy::for_platform(Platform::HubRepository), Strategy::Chunked);
        assert_eq!(Strategy::for_platform(Platform::CommunitySite), Strategy::Segmented);
        assert_eq!(Strategy::for_platform(Platform::Generic), Strategy::Segmented);
    }
}
