use crate::supervisor::{InterpreterLocator, ProcessSupervisor, WorkerState};
use crate::tests::{ScriptLauncher, fast_supervisor_config, wait_for_state};

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use jasper_config::SupervisorConfig;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tempfile::TempDir;

fn process_exists(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

// =========================================================================
// Restart Policy
// =========================================================================

#[tokio::test]
async fn given_worker_always_failing_when_started_then_restarts_stop_at_max() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exit 1", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));

    // When
    supervisor.start().await;
    let state = wait_for_state(supervisor.subscribe(), |s| {
        matches!(s, WorkerState::Failed { .. })
    })
    .await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 4);
    assert_eq!(supervisor.restart_count(), 3);
    assert!(!supervisor.is_running().await);
    match state {
        WorkerState::Failed { error } => assert!(error.contains("exited with code 1")),
        other => panic!("unexpected state {other:?}"),
    }

    // No further restarts once the budget is spent
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(resolves.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn given_zero_max_restarts_when_worker_fails_then_never_restarted() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exit 2", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(0)));

    // When
    supervisor.start().await;
    wait_for_state(supervisor.subscribe(), |s| {
        matches!(s, WorkerState::Failed { .. })
    })
    .await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 1);
    assert_eq!(supervisor.restart_count(), 0);
}

#[tokio::test]
async fn given_clean_exit_when_worker_finishes_then_not_restarted() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exit 0", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));

    // When
    supervisor.start().await;
    wait_for_state(supervisor.subscribe(), |s| *s == WorkerState::Stopped).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 1);
    assert_eq!(supervisor.restart_count(), 0);
    assert_eq!(supervisor.state(), WorkerState::Stopped);
}

#[tokio::test]
async fn given_worker_crashing_once_when_restarted_then_keeps_running() {
    // Given
    let temp = TempDir::new().unwrap();
    let script = "if [ -f crashed ]; then exec sleep 30; fi; touch crashed; exit 3";
    let (launcher, resolves) = ScriptLauncher::sh(script, temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));

    // When
    supervisor.start().await;
    let watched = supervisor.clone();
    wait_for_state(supervisor.subscribe(), move |s| {
        matches!(s, WorkerState::Running { .. }) && watched.restart_count() == 1
    })
    .await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 2);
    assert!(supervisor.is_running().await);
    let pid = supervisor.pid().await.expect("live worker has a pid");
    assert!(process_exists(pid));

    supervisor.stop().await;
    assert!(!process_exists(pid));
}

#[tokio::test]
async fn given_stop_during_restart_delay_when_delay_elapses_then_no_respawn() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exit 1", temp.path().to_path_buf());
    let config = SupervisorConfig {
        restart_delay_ms: 400,
        ..fast_supervisor_config(3)
    };
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, config));

    supervisor.start().await;
    wait_for_state(supervisor.subscribe(), |s| {
        matches!(s, WorkerState::Restarting { .. })
    })
    .await;

    // When
    supervisor.stop().await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 1);
    assert_eq!(supervisor.state(), WorkerState::Stopped);
    assert!(!supervisor.is_running().await);
}

#[tokio::test]
async fn given_worker_failing_when_restarted_then_waits_full_restart_delay() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exit 1", temp.path().to_path_buf());
    let config = SupervisorConfig {
        restart_delay_ms: 200,
        ..fast_supervisor_config(1)
    };
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, config));

    // When
    let started = Instant::now();
    supervisor.start().await;
    let mut states = supervisor.subscribe();
    let watched = resolves.clone();
    tokio::time::timeout(
        Duration::from_secs(10),
        states.wait_for(move |_| watched.load(Ordering::SeqCst) == 2),
    )
    .await
    .expect("timed out waiting for respawn")
    .expect("state channel closed");

    // Then
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(supervisor.restart_count(), 1);
}

// =========================================================================
// Spawn Failures
// =========================================================================

#[tokio::test]
async fn given_missing_interpreter_when_started_then_failures_count_against_budget() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::program(
        "/nonexistent/jasper/python3",
        vec!["server.py".into()],
        temp.path().to_path_buf(),
    );
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(2)));

    // When
    supervisor.start().await;
    let state = wait_for_state(supervisor.subscribe(), |s| {
        matches!(s, WorkerState::Failed { .. })
    })
    .await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 3);
    assert_eq!(supervisor.restart_count(), 2);
    match state {
        WorkerState::Failed { error } => assert!(error.contains("failed to spawn")),
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn given_missing_app_root_when_started_then_treated_as_spawn_failure() {
    // Given
    let locator = InterpreterLocator::new(
        "/nonexistent/jasper-app".into(),
        None,
        jasper_config::DEFAULT_ENTRY_SCRIPT,
    );
    let supervisor = Arc::new(ProcessSupervisor::new(locator, fast_supervisor_config(1)));

    // When
    supervisor.start().await;
    wait_for_state(supervisor.subscribe(), |s| {
        matches!(s, WorkerState::Failed { .. })
    })
    .await;

    // Then
    assert_eq!(supervisor.restart_count(), 1);
    assert_eq!(supervisor.pid().await, None);
}

// =========================================================================
// Start / Stop
// =========================================================================

#[tokio::test]
async fn given_running_worker_when_start_called_again_then_no_second_spawn() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exec sleep 30", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));
    supervisor.start().await;
    let first_pid = supervisor.pid().await;

    // When
    supervisor.start().await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 1);
    assert_eq!(supervisor.pid().await, first_pid);

    supervisor.stop().await;
}

#[tokio::test]
async fn given_no_worker_when_stopped_twice_then_no_error() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exec sleep 30", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));

    // When
    supervisor.stop().await;
    supervisor.stop().await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 0);
    assert_eq!(supervisor.state(), WorkerState::Stopped);
}

#[tokio::test]
async fn given_running_worker_when_stopped_then_process_gone_and_not_restarted() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exec sleep 30", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));
    supervisor.start().await;
    let pid = supervisor.pid().await.expect("worker spawned");

    // When
    supervisor.stop().await;
    supervisor.stop().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then
    assert!(!process_exists(pid));
    assert_eq!(supervisor.state(), WorkerState::Stopped);
    assert_eq!(supervisor.restart_count(), 0);
    assert_eq!(resolves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_worker_ignoring_sigterm_when_stopped_then_killed_after_timeout() {
    // Given
    let temp = TempDir::new().unwrap();
    let script = "trap '' TERM; while :; do sleep 0.05; done";
    let (launcher, _resolves) = ScriptLauncher::sh(script, temp.path().to_path_buf());
    let config = SupervisorConfig {
        shutdown_timeout_ms: 200,
        ..fast_supervisor_config(3)
    };
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, config));
    supervisor.start().await;
    let pid = supervisor.pid().await.expect("worker spawned");
    // Let the shell install its trap
    tokio::time::sleep(Duration::from_millis(200)).await;

    // When
    let started = Instant::now();
    supervisor.stop().await;

    // Then
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!process_exists(pid));
    assert_eq!(supervisor.restart_count(), 0);
}

#[tokio::test]
async fn given_stopped_worker_when_started_again_then_respawns() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, resolves) = ScriptLauncher::sh("exec sleep 30", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(3)));
    supervisor.start().await;
    supervisor.stop().await;

    // When
    supervisor.start().await;

    // Then
    assert_eq!(resolves.load(Ordering::SeqCst), 2);
    assert!(supervisor.is_running().await);
    assert!(matches!(supervisor.state(), WorkerState::Running { .. }));

    supervisor.stop().await;
}

// =========================================================================
// Worker Environment
// =========================================================================

#[tokio::test]
async fn given_extra_env_when_spawned_then_worker_sees_env_and_unbuffered_output() {
    // Given
    let temp = TempDir::new().unwrap();
    let script = r#"[ "$PYTHONUNBUFFERED" = 1 ] && [ "$JASPER_BACKEND_PORT" = 5123 ] || exit 7; exec sleep 30"#;
    let (launcher, _resolves) = ScriptLauncher::sh(script, temp.path().to_path_buf());
    let supervisor = Arc::new(
        ProcessSupervisor::new(launcher, fast_supervisor_config(0))
            .with_env("JASPER_BACKEND_PORT", "5123"),
    );

    // When
    supervisor.start().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Then
    assert!(supervisor.is_running().await);
    assert!(matches!(supervisor.state(), WorkerState::Running { .. }));

    supervisor.stop().await;
}

#[tokio::test]
async fn given_worker_cwd_when_spawned_then_runs_in_app_root() {
    // Given
    let temp = TempDir::new().unwrap();
    let (launcher, _resolves) =
        ScriptLauncher::sh("touch started-here; exit 0", temp.path().to_path_buf());
    let supervisor = Arc::new(ProcessSupervisor::new(launcher, fast_supervisor_config(0)));

    // When
    supervisor.start().await;
    wait_for_state(supervisor.subscribe(), |s| *s == WorkerState::Stopped).await;

    // Then
    assert!(temp.path().join("started-here").exists());
}
