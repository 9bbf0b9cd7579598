//! Worker process lifecycle with bounded crash recovery.

use crate::supervisor::{
    ResolveLaunch, SupervisorError, SupervisorResult, WorkerExit, WorkerLaunch, WorkerState,
};

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use jasper_config::SupervisorConfig;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Tracing target for forwarded worker stdout/stderr.
const WORKER_LOG_TARGET: &str = "worker";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

/// The live child of one spawn generation.
struct WorkerHandle {
    pid: Option<u32>,
    generation: u64,
    stop_tx: oneshot::Sender<()>,
    monitor: JoinHandle<()>,
}

#[derive(Default)]
struct SupervisorInner {
    handle: Option<WorkerHandle>,
    /// Bumped on every spawn and on `stop()`. Exits and pending restarts
    /// carrying an older value are ignored.
    generation: u64,
}

/// Owns the Python worker process.
///
/// Responsibilities:
/// - Resolve and spawn the worker, at most one at a time
/// - Forward worker output to the log
/// - Restart after unexpected exits, up to `max_restarts` per supervisor
/// - Terminate the worker on shutdown, escalating to a kill
pub struct ProcessSupervisor {
    launcher: Box<dyn ResolveLaunch>,
    config: SupervisorConfig,
    env: Vec<(String, String)>,
    inner: Mutex<SupervisorInner>,
    restart_count: AtomicU32,
    state_tx: watch::Sender<WorkerState>,
    state_rx: watch::Receiver<WorkerState>,
}

impl ProcessSupervisor {
    pub fn new(launcher: impl ResolveLaunch + 'static, config: SupervisorConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(WorkerState::Stopped);

        Self {
            launcher: Box::new(launcher),
            config,
            env: Vec::new(),
            inner: Mutex::new(SupervisorInner::default()),
            restart_count: AtomicU32::new(0),
            state_tx,
            state_rx,
        }
    }

    /// Extra environment variable passed to every worker spawn.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Spawn the worker unless one is already live.
    ///
    /// Spawn errors are logged and fed into the restart path; they are never
    /// returned to the caller.
    pub async fn start(self: &Arc<Self>) {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = &inner.handle {
            debug!(
                "Worker already running (generation {}), start ignored",
                handle.generation
            );
            return;
        }

        self.spawn_worker(&mut inner);
    }

    /// Stop the live worker and cancel any pending restart.
    ///
    /// The handle is cleared before the worker is signalled, and this waits
    /// until the monitor has reaped the process. Safe to call repeatedly.
    pub async fn stop(&self) {
        let handle = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.handle.take()
        };

        let Some(handle) = handle else {
            let pending = matches!(
                *self.state_rx.borrow(),
                WorkerState::Starting | WorkerState::Restarting { .. }
            );
            if pending {
                self.set_state(WorkerState::Stopped);
            }
            return;
        };

        info!("Stopping worker (pid {:?})", handle.pid);

        // The monitor may already be past its select after a natural exit
        let _ = handle.stop_tx.send(());
        if let Err(e) = handle.monitor.await {
            error!("Worker monitor task failed: {e}");
        }

        self.set_state(WorkerState::Stopped);
        info!("Worker stopped");
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state_rx.clone()
    }

    /// Get current state.
    pub fn state(&self) -> WorkerState {
        self.state_rx.borrow().clone()
    }

    /// Restarts performed so far. Never exceeds `max_restarts`.
    pub fn restart_count(&self) -> u32 {
        self.restart_count.load(Ordering::SeqCst)
    }

    /// PID of the live worker, if any.
    pub async fn pid(&self) -> Option<u32> {
        self.inner.lock().await.handle.as_ref().and_then(|h| h.pid)
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.handle.is_some()
    }

    // Synchronous so the monitor task it spawns can call back into the restart path.
    fn spawn_worker(self: &Arc<Self>, inner: &mut SupervisorInner) {
        inner.generation += 1;
        let generation = inner.generation;
        self.set_state(WorkerState::Starting);

        let spawned = self
            .launcher
            .resolve()
            .and_then(|launch| spawn_child(&launch, &self.env));

        match spawned {
            Ok(child) => {
                let pid = child.id();
                info!("Spawned worker with PID {pid:?} (generation {generation})");

                if let Some(pid) = pid {
                    self.set_state(WorkerState::Running { pid });
                }

                let (stop_tx, stop_rx) = oneshot::channel();
                let monitor = tokio::spawn(self.clone().monitor(child, generation, stop_rx));

                inner.handle = Some(WorkerHandle {
                    pid,
                    generation,
                    stop_tx,
                    monitor,
                });
            }
            Err(e) => {
                error!("Failed to start worker: {e}");
                let exit = WorkerExit::SpawnFailed {
                    message: e.to_string(),
                };
                tokio::spawn(self.clone().after_exit(generation, exit));
            }
        }
    }

    /// Wait for the child to exit or for a stop request.
    ///
    /// Only this task waits on or kills the child.
    async fn monitor(
        self: Arc<Self>,
        mut child: Child,
        generation: u64,
        stop_rx: oneshot::Receiver<()>,
    ) {
        let exit = tokio::select! {
            status = child.wait() => match status {
                Ok(status) => WorkerExit::from(status),
                Err(e) => {
                    error!("Failed to wait for worker: {e}");
                    WorkerExit::Exited { code: None }
                }
            },
            _ = stop_rx => {
                terminate(&mut child, self.config.shutdown_timeout()).await;
                return;
            }
        };

        self.after_exit(generation, exit).await;
    }

    async fn after_exit(self: Arc<Self>, generation: u64, exit: WorkerExit) {
        if !self.record_exit(generation, &exit).await {
            return;
        }

        tokio::time::sleep(self.config.restart_delay()).await;
        self.respawn(generation).await;
    }

    /// Clear the handle and decide whether a restart is due.
    async fn record_exit(&self, generation: u64, exit: &WorkerExit) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!("Ignoring exit of superseded worker generation {generation}");
            return false;
        }
        inner.handle = None;

        if !exit.is_unexpected() {
            info!("Worker {}, not restarting", exit.describe());
            self.set_state(WorkerState::Stopped);
            return false;
        }

        let max = self.config.max_restarts;
        let restarts = self.restart_count.load(Ordering::SeqCst);
        if restarts >= max {
            let err = SupervisorError::max_restarts(max);
            error!("Worker {}: {err}", exit.describe());
            self.set_state(WorkerState::Failed {
                error: format!("Backend {} after {restarts} restarts", exit.describe()),
            });
            return false;
        }

        let attempt = self.restart_count.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(
            "Worker {}, restarting in {}ms (attempt {attempt}/{max})",
            exit.describe(),
            self.config.restart_delay_ms
        );
        self.set_state(WorkerState::Restarting { attempt });
        true
    }

    async fn respawn(self: &Arc<Self>, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation || inner.handle.is_some() {
            debug!("Restart of worker generation {generation} cancelled");
            return;
        }

        self.spawn_worker(&mut inner);
    }

    fn set_state(&self, state: WorkerState) {
        info!("Worker state: {state}");
        let _ = self.state_tx.send(state);
    }
}

fn spawn_child(launch: &WorkerLaunch, env: &[(String, String)]) -> SupervisorResult<Child> {
    debug!(
        "Launching {} interpreter {} in {}",
        launch.source,
        launch.program.display(),
        launch.cwd.display()
    );

    let mut cmd = Command::new(&launch.program);
    cmd.args(&launch.args)
        .current_dir(&launch.cwd)
        .env("PYTHONUNBUFFERED", "1")
        .envs(env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group so termination reaches the worker's children too
    #[cfg(unix)]
    cmd.process_group(0);

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    let mut child = cmd
        .spawn()
        .map_err(|e| SupervisorError::spawn(launch.program.display().to_string(), e))?;

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_output(stdout, "stdout"));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_output(stderr, "stderr"));
    }

    Ok(child)
}

/// Forward worker output line by line. Reads to EOF so the pipe never fills.
async fn forward_output<R: AsyncRead + Unpin>(stream: R, name: &'static str) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                info!(target: WORKER_LOG_TARGET, "[{name}] {}", line.trim_end());
            }
            Err(e) => {
                debug!("Worker {name} closed: {e}");
                break;
            }
        }
    }
}

/// Ask the worker to exit, then kill it once `timeout` has passed.
async fn terminate(child: &mut Child, timeout: Duration) {
    // None once the child has been reaped
    let Some(pid) = child.id() else {
        return;
    };

    request_termination(pid).await;

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => info!("Worker (pid {pid}) exited: {status}"),
        Ok(Err(e)) => warn!("Failed to wait for worker (pid {pid}): {e}"),
        Err(_) => {
            warn!(
                "Worker (pid {pid}) still running after {}ms, killing",
                timeout.as_millis()
            );

            #[cfg(unix)]
            {
                use nix::sys::signal::{Signal, killpg};
                use nix::unistd::Pid;

                killpg(Pid::from_raw(pid as i32), Signal::SIGKILL).ok();
            }

            if let Err(e) = child.kill().await {
                warn!("Failed to kill worker (pid {pid}): {e}");
            }
        }
    }
}

#[cfg(unix)]
async fn request_termination(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    info!("Sending SIGTERM to worker process group {pid}");
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        warn!("Failed to signal worker (pid {pid}): {e}");
    }
}

#[cfg(windows)]
async fn request_termination(pid: u32) {
    info!("Terminating worker process tree {pid}");

    let status = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .creation_flags(CREATE_NO_WINDOW)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("taskkill for pid {pid} returned {status}"),
        Err(e) => warn!("Failed to run taskkill for pid {pid}: {e}"),
    }
}
