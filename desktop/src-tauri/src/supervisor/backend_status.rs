use crate::supervisor::{ReadinessState, WorkerState};

use serde::Serialize;

/// Payload of the `backend-status` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub state: String,
    pub pid: Option<u32>,
    pub restart_count: u32,
    /// Whether the last health probe succeeded
    pub connected: bool,
    pub error: Option<String>,
}

impl BackendStatus {
    pub fn new(state: &WorkerState, restart_count: u32, readiness: ReadinessState) -> Self {
        let error = match state {
            WorkerState::Failed { error } => Some(error.clone()),
            _ => None,
        };

        Self {
            state: state.to_string(),
            pid: state.pid(),
            restart_count,
            connected: readiness == ReadinessState::Ready,
            error,
        }
    }
}
