use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, early close).
    Connection,
    /// Retryable server error (5xx).
    Http5xx(u16),
    /// Anything else; not retried.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff with a cap on both attempts and delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || kind == ErrorKind::Other {
            return RetryDecision::NoRetry;
        }
        let shift = attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_is_never_retried() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let p = RetryPolicy {
            max_attempts: 20,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        };
        assert_eq!(
            p.decide(1, ErrorKind::Timeout),
            RetryDecision::RetryAfter(Duration::from_millis(100))
        );
        assert_eq!(
            p.decide(3, ErrorKind::Connection),
            RetryDecision::RetryAfter(Duration::from_millis(400))
        );
        assert_eq!(
            p.decide(12, ErrorKind::Throttled),
            RetryDecision::RetryAfter(Duration::from_secs(1))
        );
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        };
        assert!(matches!(
            p.decide(1, ErrorKind::Http5xx(500)),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.decide(2, ErrorKind::Http5xx(500)), RetryDecision::NoRetry);
        assert_eq!(
            RetryPolicy::no_retry().decide(1, ErrorKind::Timeout),
            RetryDecision::NoRetry
        );
    }
}
