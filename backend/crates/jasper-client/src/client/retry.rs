//! Linear-backoff retry policy for backend calls.

use std::time::Duration;

use jasper_config::RetryConfig;
use reqwest::Method;

/// Whether a request may be resent after a transient failure.
///
/// Resending is only safe when the call has no side effects, so it is
/// decided per request rather than applied to every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Send once and surface the first failure
    Never,
    /// Resend on transient failures, bounded by the policy
    OnTransient,
}

impl Retry {
    /// Default for a method: idempotent methods retry, POST/PATCH do not.
    pub fn default_for(method: &Method) -> Self {
        if method.is_idempotent() {
            Retry::OnTransient
        } else {
            Retry::Never
        }
    }
}

/// Per-request attempt counter. Lives for one call only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryContext {
    /// Retries performed so far (0 on the first attempt)
    pub retries: u32,
}

/// Bounded linear backoff: the n-th retry waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// True while the context is below the retry ceiling.
    pub fn can_retry(&self, ctx: &RetryContext) -> bool {
        ctx.retries < self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }

    /// Record one more retry and return how long to wait before sending it.
    ///
    /// Returns `None` once the ceiling is reached; the context is left
    /// untouched in that case.
    pub fn next_delay(&self, ctx: &mut RetryContext) -> Option<Duration> {
        if !self.can_retry(ctx) {
            return None;
        }
        ctx.retries += 1;
        Some(self.delay_for(ctx.retries))
    }

    /// Worst-case time spent sleeping across all retries.
    pub fn total_delay(&self) -> Duration {
        (1..=self.max_retries).map(|n| self.delay_for(n)).sum()
    }
}
