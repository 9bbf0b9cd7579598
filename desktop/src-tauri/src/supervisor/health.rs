//! Readiness probing of the worker's HTTP endpoint.

use crate::supervisor::{SupervisorError, SupervisorResult};

use std::time::Duration;

use jasper_client::{ApiClient, RetryPolicy};
use jasper_config::Config;
use tracing::{debug, info};

/// Backend readiness as last observed by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    /// Not probed yet
    Unknown,
    Ready,
    Unreachable,
}

/// Polls `GET /api/health` until the worker answers `{"status": "ok"}`.
///
/// Each probe is a single request; the polling loop is the only retry.
pub struct HealthProbe {
    client: ApiClient,
}

impl HealthProbe {
    /// # Arguments
    /// * `base_url` - Worker URL (e.g., "http://127.0.0.1:5123")
    /// * `request_timeout` - Upper bound for a single probe request
    pub fn new(base_url: &str, request_timeout: Duration) -> SupervisorResult<Self> {
        let client = ApiClient::with_policy(base_url, RetryPolicy::disabled())
            .with_timeout(request_timeout)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> SupervisorResult<Self> {
        Self::new(&config.backend.base_url(), config.health.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.client.base_url
    }

    /// Perform a single health check.
    ///
    /// Any transport error, non-2xx status, unparsable body or a status
    /// other than "ok" counts as unreachable.
    pub async fn check(&self) -> ReadinessState {
        match self.client.health().await {
            Ok(health) if health.is_ok() => ReadinessState::Ready,
            Ok(health) => {
                debug!("Backend reported status {:?}", health.status);
                ReadinessState::Unreachable
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                ReadinessState::Unreachable
            }
        }
    }

    /// Poll until ready, sleeping a constant `delay` between attempts.
    ///
    /// There is no sleep after the final attempt.
    pub async fn wait_until_ready(&self, max_attempts: u32, delay: Duration) -> SupervisorResult<()> {
        for attempt in 1..=max_attempts {
            if self.check().await == ReadinessState::Ready {
                info!("Backend ready after {attempt} attempt(s)");
                return Ok(());
            }

            if attempt < max_attempts {
                tokio::time::sleep(delay).await;
            }
        }

        Err(SupervisorError::probe_timeout(max_attempts))
    }
}
