mod backend_status;
mod commands;
#[cfg(unix)]
mod supervisor;
mod window;

use crate::supervisor::{
    InterpreterSource, ResolveLaunch, SupervisorResult, WorkerLaunch, WorkerState,
};

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use jasper_config::SupervisorConfig;
use tokio::sync::watch;

/// Launches `/bin/sh -c <script>` and counts how often it was resolved,
/// i.e. how many spawns were attempted.
pub(crate) struct ScriptLauncher {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: PathBuf,
    resolves: Arc<AtomicU32>,
}

impl ScriptLauncher {
    pub(crate) fn sh(script: &str, cwd: PathBuf) -> (Self, Arc<AtomicU32>) {
        Self::program("/bin/sh", vec!["-c".into(), script.into()], cwd)
    }

    pub(crate) fn program(
        program: &str,
        args: Vec<OsString>,
        cwd: PathBuf,
    ) -> (Self, Arc<AtomicU32>) {
        let resolves = Arc::new(AtomicU32::new(0));
        let launcher = Self {
            program: PathBuf::from(program),
            args,
            cwd,
            resolves: resolves.clone(),
        };
        (launcher, resolves)
    }
}

impl ResolveLaunch for ScriptLauncher {
    fn resolve(&self) -> SupervisorResult<WorkerLaunch> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        Ok(WorkerLaunch {
            program: self.program.clone(),
            args: self.args.clone(),
            cwd: self.cwd.clone(),
            source: InterpreterSource::System,
        })
    }
}

/// Fast restart policy for process tests.
pub(crate) fn fast_supervisor_config(max_restarts: u32) -> SupervisorConfig {
    SupervisorConfig {
        max_restarts,
        restart_delay_ms: 20,
        shutdown_timeout_ms: 1_000,
    }
}

/// Wait (bounded) until the state satisfies `pred`.
pub(crate) async fn wait_for_state(
    mut rx: watch::Receiver<WorkerState>,
    pred: impl FnMut(&WorkerState) -> bool,
) -> WorkerState {
    let state = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(pred))
        .await
        .expect("timed out waiting for worker state")
        .expect("state channel closed");
    WorkerState::clone(&state)
}
