use std::fmt;

/// Current state of the worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    /// No worker is running
    Stopped,
    /// Spawn in progress
    Starting,
    /// Worker process is alive
    Running { pid: u32 },
    /// Waiting out the restart delay after an unexpected exit
    Restarting { attempt: u32 },
    /// Restart budget exhausted; the UI keeps running disconnected
    Failed { error: String },
}

impl WorkerState {
    pub fn pid(&self) -> Option<u32> {
        match self {
            Self::Running { pid } => Some(*pid),
            _ => None,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Starting => write!(f, "starting"),
            Self::Running { .. } => write!(f, "running"),
            Self::Restarting { .. } => write!(f, "restarting"),
            Self::Failed { .. } => write!(f, "failed"),
        }
    }
}
