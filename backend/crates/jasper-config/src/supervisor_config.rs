use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const MIN_MAX_RESTARTS: u32 = 0;
pub const MAX_MAX_RESTARTS: u32 = 10;
pub const DEFAULT_MAX_RESTARTS: u32 = 3;

pub const MIN_RESTART_DELAY_MS: u64 = 100;
pub const MAX_RESTART_DELAY_MS: u64 = 60_000;
pub const DEFAULT_RESTART_DELAY_MS: u64 = 2_000;

pub const MIN_SHUTDOWN_TIMEOUT_MS: u64 = 100;
pub const MAX_SHUTDOWN_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 5_000;

/// Restart and shutdown policy for the worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Restarts allowed per application run after unexpected exits
    pub max_restarts: u32,
    /// Fixed delay before each restart
    pub restart_delay_ms: u64,
    /// Grace period between SIGTERM and a forced kill
    pub shutdown_timeout_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_restarts: DEFAULT_MAX_RESTARTS,
            restart_delay_ms: DEFAULT_RESTART_DELAY_MS,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
        }
    }
}

impl SupervisorConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_restarts > MAX_MAX_RESTARTS {
            return Err(ConfigError::config(format!(
                "supervisor.max_restarts must be {}-{}, got {}",
                MIN_MAX_RESTARTS, MAX_MAX_RESTARTS, self.max_restarts
            )));
        }

        if self.restart_delay_ms < MIN_RESTART_DELAY_MS
            || self.restart_delay_ms > MAX_RESTART_DELAY_MS
        {
            return Err(ConfigError::config(format!(
                "supervisor.restart_delay_ms must be {}-{}, got {}",
                MIN_RESTART_DELAY_MS, MAX_RESTART_DELAY_MS, self.restart_delay_ms
            )));
        }

        if self.shutdown_timeout_ms < MIN_SHUTDOWN_TIMEOUT_MS
            || self.shutdown_timeout_ms > MAX_SHUTDOWN_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "supervisor.shutdown_timeout_ms must be {}-{}, got {}",
                MIN_SHUTDOWN_TIMEOUT_MS, MAX_SHUTDOWN_TIMEOUT_MS, self.shutdown_timeout_ms
            )));
        }

        Ok(())
    }
}
