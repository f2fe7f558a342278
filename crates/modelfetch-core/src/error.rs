//! Per-task error taxonomy. Every variant ends up as a `Failed` outcome;
//! none of them escapes the batch scheduler.

use std::io;
use std::path::Path;
use thiserror::Error;

use crate::retry::TransferError;

#[derive(Debug, Error)]
pub enum FetchError {
    /// URL does not match the grammar of its platform.
    #[error("malformed URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },
    /// Network or transport failure after connection-level retries.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
    /// Destination or staging directory unusable.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: io::Error,
    },
    /// Batch was interrupted before this task started.
    #[error("interrupted before start")]
    Interrupted,
    /// Worker ended abnormally (panic inside the fetch).
    #[error("worker aborted: {0}")]
    WorkerAborted(String),
}

impl FetchError {
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        FetchError::MalformedUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(action: &str, path: &Path, source: io::Error) -> Self {
        FetchError::Filesystem {
            context: format!("{} {}", action, path.display()),
            source,
        }
    }

    /// Short stable label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MalformedUrl { .. } => "malformed_url",
            FetchError::TransferFailed(_) => "transfer_failed",
            FetchError::Filesystem { .. } => "filesystem",
            FetchError::Interrupted => "interrupted",
            FetchError::WorkerAborted(_) => "worker_aborted",
        }
    }
}
