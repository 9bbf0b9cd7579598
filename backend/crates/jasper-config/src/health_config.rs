use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const MIN_MAX_ATTEMPTS: u32 = 1;
pub const MAX_MAX_ATTEMPTS: u32 = 600;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

pub const MIN_DELAY_MS: u64 = 50;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_DELAY_MS: u64 = 1_000;

pub const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;

pub const MIN_LIVENESS_INTERVAL_SECS: u64 = 1;
pub const MAX_LIVENESS_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LIVENESS_INTERVAL_SECS: u64 = 5;

/// Readiness probe settings.
///
/// Worst-case startup wait is roughly `max_attempts * delay_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_attempts: u32,
    /// Constant spacing between probe attempts
    pub delay_ms: u64,
    pub request_timeout_ms: u64,
    /// Interval of the post-launch liveness probe
    pub liveness_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            liveness_interval_secs: DEFAULT_LIVENESS_INTERVAL_SECS,
        }
    }
}

impl HealthConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn liveness_interval(&self) -> Duration {
        Duration::from_secs(self.liveness_interval_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_attempts < MIN_MAX_ATTEMPTS || self.max_attempts > MAX_MAX_ATTEMPTS {
            return Err(ConfigError::config(format!(
                "health.max_attempts must be {}-{}, got {}",
                MIN_MAX_ATTEMPTS, MAX_MAX_ATTEMPTS, self.max_attempts
            )));
        }

        if self.delay_ms < MIN_DELAY_MS || self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::config(format!(
                "health.delay_ms must be {}-{}, got {}",
                MIN_DELAY_MS, MAX_DELAY_MS, self.delay_ms
            )));
        }

        if self.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS
            || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "health.request_timeout_ms must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_MS, MAX_REQUEST_TIMEOUT_MS, self.request_timeout_ms
            )));
        }

        if self.liveness_interval_secs < MIN_LIVENESS_INTERVAL_SECS
            || self.liveness_interval_secs > MAX_LIVENESS_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "health.liveness_interval_secs must be {}-{}, got {}",
                MIN_LIVENESS_INTERVAL_SECS, MAX_LIVENESS_INTERVAL_SECS, self.liveness_interval_secs
            )));
        }

        Ok(())
    }
}
