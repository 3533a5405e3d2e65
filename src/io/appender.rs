use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, rng};
use tracing::{debug, warn};

use super::AppendTarget;
use crate::error::{Error, Result};

/// Backoff schedule for busy destinations.
///
/// Retry `n` (1-based) waits `base_backoff + (n - 1) * backoff_step` plus a
/// random jitter in `0..=max_jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub backoff_step: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            backoff_step: Duration::from_millis(100),
            max_jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without sleeping
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_backoff: Duration::ZERO,
            backoff_step: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry`, jitter excluded
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff + self.backoff_step * retry.saturating_sub(1)
    }

    fn delay(&self, retry: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rng().random_range(0..=jitter_ms))
        };
        self.backoff(retry) + jitter
    }
}

/// Appends chunks to one destination, riding out short-lived `ResourceBusy`
/// errors.
///
/// Callers must not issue overlapping appends; the retry only absorbs
/// contention from other processes.
pub struct ResilientAppender<T: AppendTarget> {
    target: Arc<T>,
    path: PathBuf,
    policy: RetryPolicy,
}

impl<T: AppendTarget> ResilientAppender<T> {
    pub fn new(target: Arc<T>, path: PathBuf) -> Self {
        Self::with_policy(target, path, RetryPolicy::default())
    }

    pub fn with_policy(target: Arc<T>, path: PathBuf, policy: RetryPolicy) -> Self {
        Self {
            target,
            path,
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `contents`, retrying the same chunk while the destination is busy.
    ///
    /// # Errors
    ///
    /// [`Error::RetriesExhausted`] when every attempt hit `ResourceBusy`,
    /// [`Error::Io`] for any other failure.
    pub async fn append(&self, contents: &str) -> Result<()> {
        let mut retry_count = 0;

        loop {
            match self.target.append(&self.path, contents.as_bytes()).await {
                Ok(()) => {
                    debug!(path = %self.path.display(), bytes = contents.len(), "appended");
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::ResourceBusy => {
                    if retry_count >= self.policy.max_retries {
                        return Err(Error::RetriesExhausted {
                            path: self.path.clone(),
                            attempts: retry_count + 1,
                            source: e,
                        });
                    }
                    retry_count += 1;
                    let delay = self.policy.delay(retry_count);
                    warn!(
                        path = %self.path.display(),
                        retry = retry_count,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "destination busy, retrying append"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(Error::io(&self.path, e)),
            }
        }
    }
}
