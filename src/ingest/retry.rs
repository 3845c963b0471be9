// src/ingest/retry.rs
use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff for upstream calls. Every failure is retried
/// identically; a retried call that succeeded upstream but failed to come
/// back can double-fetch, which downstream dedup and the idempotent store
/// absorb.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub growth: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
            growth: 1.3,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following attempt `attempt` (0-based):
    /// `base_delay * growth^attempt`. No jitter, no cap.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.mul_f64(self.growth.powi(attempt as i32))
    }
}

/// Run `op` until it succeeds or the attempt budget is spent, sleeping
/// between attempts per the policy. The final error is propagated as-is.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..policy.max_attempts {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                tracing::debug!(attempt, error = %e, "retryable call failed");
                last_err = Some(e);
                if attempt + 1 < policy.max_attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("retry budget exhausted")))
}
