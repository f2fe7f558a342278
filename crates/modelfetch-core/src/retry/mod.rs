//! Retry and backoff policy.
//!
//! Retries happen only at the connection level (a segment, or a resumed
//! chunked pull). A task that fails after its connections gave up stays failed.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
