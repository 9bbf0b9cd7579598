use crate::supervisor::{BackendStatus, ReadinessState, WorkerState};

use googletest::prelude::*;

#[test]
fn given_running_and_ready_then_connected_with_pid() {
    let status = BackendStatus::new(&WorkerState::Running { pid: 4242 }, 1, ReadinessState::Ready);

    assert_that!(
        status,
        eq(&BackendStatus {
            state: "running".to_string(),
            pid: Some(4242),
            restart_count: 1,
            connected: true,
            error: None,
        })
    );
}

#[test]
fn given_restarting_then_no_pid_and_disconnected() {
    let status = BackendStatus::new(
        &WorkerState::Restarting { attempt: 2 },
        2,
        ReadinessState::Unreachable,
    );

    assert_that!(status.state.as_str(), eq("restarting"));
    assert_that!(status.pid, none());
    assert!(!status.connected);
}

#[test]
fn given_failed_then_error_carried() {
    let state = WorkerState::Failed {
        error: "Backend exited with code 1 after 3 restarts".to_string(),
    };

    let status = BackendStatus::new(&state, 3, ReadinessState::Unreachable);

    assert_that!(status.state.as_str(), eq("failed"));
    assert_that!(
        status.error.as_deref(),
        some(eq("Backend exited with code 1 after 3 restarts"))
    );
}

#[test]
fn given_unknown_readiness_then_not_connected() {
    let status = BackendStatus::new(&WorkerState::Starting, 0, ReadinessState::Unknown);

    assert!(!status.connected);
    assert_that!(status.state.as_str(), eq("starting"));
}

#[test]
fn given_status_when_serialized_then_snake_case_fields() {
    let status = BackendStatus::new(&WorkerState::Stopped, 0, ReadinessState::Ready);

    let json = serde_json::to_value(&status).unwrap();

    assert_that!(
        json,
        eq(&serde_json::json!({
            "state": "stopped",
            "pid": null,
            "restart_count": 0,
            "connected": true,
            "error": null,
        }))
    );
}
