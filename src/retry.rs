//! Bounded retry around deliverable reads.
//!
//! The producing translation tool may still hold the package open, or may
//! not have finished writing it, when the create event fires. Lock errors
//! are absorbed with a fixed delay up to a bounded attempt count; a missing
//! file is terminal (the reader has already probed its fallback location).

use std::time::Duration;

use tracing::debug;

use crate::config::RetryConfig;
use crate::error::SourceError;

/// Retry policy for deliverable reads.
///
/// Delays are plain data so tests can run with zero wall-clock cost.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum read attempts for a locked file.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Settle delay before the first attempt.
    pub settle: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_secs(config.delay_secs),
            settle: Duration::from_secs(config.settle_secs),
        }
    }

    /// Policy with no delays, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Run a read operation under the retry policy.
///
/// `AccessDenied` is retried with a fixed delay up to `max_attempts`;
/// every other error is terminal on first occurrence.
pub async fn retry_read<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, SourceError>
where
    F: FnMut() -> Result<T, SourceError>,
{
    if !policy.settle.is_zero() {
        tokio::time::sleep(policy.settle).await;
    }

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_access_denied() && attempt < policy.max_attempts => {
                debug!(attempt, max_attempts = policy.max_attempts, error = %e, "Deliverable locked, retrying");
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn access_denied() -> SourceError {
        SourceError::AccessDenied {
            path: PathBuf::from("/tmp/locked.wsxz"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
    }

    fn not_found() -> SourceError {
        SourceError::NotFound {
            path: PathBuf::from("/tmp/missing.wsxz"),
        }
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let result = retry_read(&RetryPolicy::immediate(10), || Ok(42)).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_access_denied_until_success() {
        let mut attempts = 0;
        let result = retry_read(&RetryPolicy::immediate(10), || {
            attempts += 1;
            if attempts < 4 {
                Err(access_denied())
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts, 4);
    }

    #[tokio::test]
    async fn exhausts_bounded_attempts() {
        let mut attempts = 0;
        let result: Result<(), _> = retry_read(&RetryPolicy::immediate(10), || {
            attempts += 1;
            Err(access_denied())
        })
        .await;
        assert!(result.unwrap_err().is_access_denied());
        assert_eq!(attempts, 10);
    }

    #[tokio::test]
    async fn not_found_is_terminal_immediately() {
        let mut attempts = 0;
        let result: Result<(), _> = retry_read(&RetryPolicy::immediate(10), || {
            attempts += 1;
            Err(not_found())
        })
        .await;
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(attempts, 1);
    }
}
