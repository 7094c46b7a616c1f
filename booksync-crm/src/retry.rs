//! Bounded exponential backoff for CRM requests.

use std::time::Duration;

use tracing::{debug, warn};

use booksync_core::telemetry;
use booksync_core::{Sleeper, SyncError};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = no retries).
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// 429, 5xx and failures without any response are transient.
    /// Access-denied is never retried.
    #[must_use]
    pub fn is_transient(error: &SyncError) -> bool {
        match error {
            SyncError::SourceStore { status: None, .. } => true,
            SyncError::SourceStore {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `f` until it succeeds, fails permanently, or retries run out.
    /// The last error is returned unchanged so its status survives.
    pub async fn execute<F, Fut, T>(
        &self,
        sleeper: &dyn Sleeper,
        operation: &str,
        mut f: F,
    ) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SyncError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation, attempt = attempt + 1, "CRM request succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !Self::is_transient(&error) || attempt >= self.max_retries {
                        return Err(error);
                    }
                    telemetry::emit_crm_status(error.status());
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        status = ?error.status(),
                        error = %error,
                        "retrying failed CRM request"
                    );
                    sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
