use crate::{ConfigError, ConfigErrorResult};

use serde::{Deserialize, Serialize};

// Retry constraints
pub const MIN_MAX_RETRIES: u32 = 0;
pub const MAX_MAX_RETRIES: u32 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const MIN_BASE_DELAY_MS: u64 = 10;
pub const MAX_BASE_DELAY_MS: u64 = 10_000;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

/// Retry configuration for API calls to the backend.
///
/// Backoff is linear: the n-th retry waits `base_delay_ms * n`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::config(format!(
                "retry.max_retries must be {}-{}, got {}",
                MIN_MAX_RETRIES, MAX_MAX_RETRIES, self.max_retries
            )));
        }

        if self.base_delay_ms < MIN_BASE_DELAY_MS || self.base_delay_ms > MAX_BASE_DELAY_MS {
            return Err(ConfigError::config(format!(
                "retry.base_delay_ms must be {}-{}, got {}",
                MIN_BASE_DELAY_MS, MAX_BASE_DELAY_MS, self.base_delay_ms
            )));
        }

        Ok(())
    }
}
