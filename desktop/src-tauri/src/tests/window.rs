use crate::supervisor::{HealthProbe, ReadinessState};
use crate::window::{MAIN_WINDOW_LABEL, WindowController, WindowHost};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use googletest::prelude::*;
use jasper_config::{HealthConfig, WindowConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory window host. Clones share state so a test can keep a handle
/// after moving one into the controller.
#[derive(Clone, Default)]
struct FakeHost {
    windows: Arc<Mutex<HashSet<String>>>,
    created: Arc<AtomicU32>,
    fail_create: bool,
}

impl FakeHost {
    fn open(&self, label: &str) {
        self.windows.lock().unwrap().insert(label.to_string());
    }

    fn close(&self, label: &str) {
        self.windows.lock().unwrap().remove(label);
    }

    fn created(&self) -> u32 {
        self.created.load(Ordering::SeqCst)
    }
}

impl WindowHost for FakeHost {
    fn has_window(&self, label: &str) -> bool {
        self.windows.lock().unwrap().contains(label)
    }

    fn create_window(&self, label: &str, _config: &WindowConfig) -> tauri::Result<()> {
        if self.fail_create {
            return Err(tauri::Error::Io(std::io::Error::other("no display")));
        }
        self.windows.lock().unwrap().insert(label.to_string());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fast_health() -> HealthConfig {
    HealthConfig {
        max_attempts: 2,
        delay_ms: 10,
        ..HealthConfig::default()
    }
}

fn controller(host: FakeHost, base_url: &str) -> WindowController<FakeHost> {
    let probe = HealthProbe::new(base_url, Duration::from_millis(300)).unwrap();
    WindowController::new(host, probe, fast_health(), WindowConfig::default())
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(jasper_config::HEALTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .mount(&server)
        .await;
    server
}

// =========================================================================
// Launch
// =========================================================================

#[tokio::test]
async fn given_ready_backend_when_launched_then_window_created_and_ready() {
    // Given
    let server = healthy_server().await;
    let host = FakeHost::default();
    let controller = controller(host.clone(), &server.uri());

    // When
    let readiness = controller.launch().await;

    // Then
    assert_that!(readiness, ok(eq(&ReadinessState::Ready)));
    assert_that!(host.created(), eq(1));
    assert!(host.has_window(MAIN_WINDOW_LABEL));
}

#[tokio::test]
async fn given_unreachable_backend_when_launched_then_window_still_created() {
    // Given
    let host = FakeHost::default();
    let controller = controller(host.clone(), "http://127.0.0.1:9");

    // When
    let readiness = controller.launch().await;

    // Then
    assert_that!(readiness, ok(eq(&ReadinessState::Unreachable)));
    assert_that!(host.created(), eq(1));
    assert!(host.has_window(MAIN_WINDOW_LABEL));
}

#[tokio::test]
async fn given_window_open_when_launched_again_then_not_duplicated() {
    // Given
    let server = healthy_server().await;
    let host = FakeHost::default();
    host.open(MAIN_WINDOW_LABEL);
    let controller = controller(host.clone(), &server.uri());

    // When
    controller.launch().await.unwrap();
    controller.launch().await.unwrap();

    // Then
    assert_that!(host.created(), eq(0));
}

#[tokio::test]
async fn given_no_window_when_launched_twice_then_created_once() {
    // Given
    let server = healthy_server().await;
    let host = FakeHost::default();
    let controller = controller(host.clone(), &server.uri());

    // When
    controller.launch().await.unwrap();
    controller.launch().await.unwrap();

    // Then
    assert_that!(host.created(), eq(1));
}

#[tokio::test]
async fn given_host_cannot_create_windows_when_launched_then_error() {
    // Given
    let server = healthy_server().await;
    let host = FakeHost {
        fail_create: true,
        ..FakeHost::default()
    };
    let controller = controller(host.clone(), &server.uri());

    // When
    let result = controller.launch().await;

    // Then
    assert_that!(result, err(anything()));
    assert!(!host.has_window(MAIN_WINDOW_LABEL));
}

// =========================================================================
// Ensure Window
// =========================================================================

#[test]
fn given_no_window_when_ensured_twice_then_created_once() {
    // Given
    let host = FakeHost::default();
    let controller = controller(host.clone(), "http://127.0.0.1:9");

    // When
    let first = controller.ensure_window().unwrap();
    let second = controller.ensure_window().unwrap();

    // Then
    assert!(first);
    assert!(!second);
    assert_that!(host.created(), eq(1));
}

#[test]
fn given_closed_window_when_ensured_then_recreated() {
    // Given
    let host = FakeHost::default();
    host.open(MAIN_WINDOW_LABEL);
    host.close(MAIN_WINDOW_LABEL);
    let controller = controller(host.clone(), "http://127.0.0.1:9");

    // When
    let created = controller.ensure_window().unwrap();

    // Then
    assert!(created);
    assert_that!(host.created(), eq(1));
}
