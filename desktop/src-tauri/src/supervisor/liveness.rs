//! Post-launch liveness reporting to the webview.

use crate::supervisor::{BackendStatus, HealthProbe, ProcessSupervisor, ReadinessState};

use std::sync::Arc;
use std::time::Duration;

use tauri::{AppHandle, Emitter, Runtime};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Tauri event carrying a `BackendStatus` (must match the UI listener)
pub const EVENT_BACKEND_STATUS: &str = "backend-status";

/// Receiver of status updates.
pub trait StatusSink: Send + Sync {
    fn publish(&self, status: &BackendStatus);
}

impl<R: Runtime> StatusSink for AppHandle<R> {
    fn publish(&self, status: &BackendStatus) {
        if let Err(e) = self.emit(EVENT_BACKEND_STATUS, status) {
            warn!("Failed to emit {EVENT_BACKEND_STATUS}: {e}");
        }
    }
}

/// Probes the backend on an interval and publishes a status whenever
/// readiness or the worker state changes.
pub struct LivenessMonitor {
    probe: HealthProbe,
    supervisor: Arc<ProcessSupervisor>,
    interval: Duration,
}

impl LivenessMonitor {
    pub fn new(probe: HealthProbe, supervisor: Arc<ProcessSupervisor>, interval: Duration) -> Self {
        Self {
            probe,
            supervisor,
            interval,
        }
    }

    /// Runs for the lifetime of the app.
    pub async fn run(self, sink: impl StatusSink) {
        let mut state_rx = self.supervisor.subscribe();
        let mut readiness = ReadinessState::Unknown;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let next = self.probe.check().await;
                    if next == readiness {
                        continue;
                    }

                    match next {
                        ReadinessState::Ready => info!("Backend connected at {}", self.probe.base_url()),
                        _ => warn!("Backend unreachable at {}", self.probe.base_url()),
                    }
                    readiness = next;
                }
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let state = self.supervisor.state();
            sink.publish(&BackendStatus::new(
                &state,
                self.supervisor.restart_count(),
                readiness,
            ));
        }
    }
}
