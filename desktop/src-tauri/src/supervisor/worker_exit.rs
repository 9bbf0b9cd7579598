use std::process::ExitStatus;

/// How a worker generation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// Process exited on its own; `None` when it was killed by a signal
    Exited { code: Option<i32> },
    /// Interpreter could not be resolved or started
    SpawnFailed { message: String },
}

impl WorkerExit {
    /// Non-zero exit codes and spawn failures count against the restart budget.
    /// A clean exit or a signal death leaves the worker stopped.
    pub fn is_unexpected(&self) -> bool {
        match self {
            Self::Exited { code } => matches!(code, Some(c) if *c != 0),
            Self::SpawnFailed { .. } => true,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Exited { code: Some(code) } => format!("exited with code {code}"),
            Self::Exited { code: None } => "terminated by signal".to_string(),
            Self::SpawnFailed { message } => format!("failed to spawn: {message}"),
        }
    }
}

impl From<ExitStatus> for WorkerExit {
    fn from(status: ExitStatus) -> Self {
        Self::Exited {
            code: status.code(),
        }
    }
}
