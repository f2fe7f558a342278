//! Transport-level error type, classified before it reaches the task boundary.

use thiserror::Error;

/// Error from a single HTTP transfer attempt (probe, segment or chunked pull).
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection reset, DNS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body ended before the advertised length.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Writing the staged file failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
