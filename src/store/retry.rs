//! Timeouts and bounded retries around store calls

use std::future::Future;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// How long a single store call may take and how often a lookup is retried
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first one
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            timeout: config.timeout(),
            retries: config.lookup_retries,
            backoff: config.retry_backoff(),
        }
    }

    /// Run one non-idempotent call (an insert) under the timeout, never retried
    pub async fn once<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::Timeout(op))?
    }

    /// Run an idempotent lookup, retrying transient failures with jittered
    /// linear backoff
    pub async fn lookup<T, F, Fut>(&self, op: &'static str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match self.once(op, call()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "Store lookup '{}' failed ({}), retry {}/{} in {:?}",
                        op,
                        e,
                        attempt,
                        self.retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.backoff.as_millis() as u64 * attempt as u64;
        let jitter = if base > 1 {
            rand::random::<u64>() % (base / 2 + 1)
        } else {
            0
        };
        Duration::from_millis(base + jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DatabaseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(50),
            retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_lookup_retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(2);

        let result = policy
            .lookup("find", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::Timeout("find"))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_lookup_gives_up_after_retries() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(1);

        let result: Result<()> = policy
            .lookup("find", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Timeout("find"))
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result: Result<()> = policy
            .lookup("find", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Other("boom".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_once_times_out() {
        let policy = fast_policy(0);
        let result: Result<()> = policy
            .once("insert", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout("insert"))));
    }
}
