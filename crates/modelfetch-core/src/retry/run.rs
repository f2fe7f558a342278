//! Retry loop: run a closure until success or policy says stop.

use super::classify::classify;
use super::error::TransferError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the policy gives up. Sleeps the backoff
/// between attempts, so call from a blocking context.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, TransferError>
where
    F: FnMut(u32) -> Result<T, TransferError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, error = %e, delay_ms = d.as_millis() as u64, "retrying transfer");
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
