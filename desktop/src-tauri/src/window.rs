//! Main window creation, gated on backend readiness.

use crate::supervisor::{HealthProbe, ReadinessState};

use jasper_config::{HealthConfig, WindowConfig};
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindowBuilder};
use tracing::{error, info, warn};

/// Label of the single application window.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Something that can host webview windows.
pub trait WindowHost: Send + Sync {
    fn has_window(&self, label: &str) -> bool;
    fn create_window(&self, label: &str, config: &WindowConfig) -> tauri::Result<()>;
}

impl<R: Runtime> WindowHost for AppHandle<R> {
    fn has_window(&self, label: &str) -> bool {
        self.get_webview_window(label).is_some()
    }

    fn create_window(&self, label: &str, config: &WindowConfig) -> tauri::Result<()> {
        WebviewWindowBuilder::new(self, label, WebviewUrl::default())
            .title(&config.title)
            .inner_size(f64::from(config.width), f64::from(config.height))
            .min_inner_size(f64::from(config.min_width), f64::from(config.min_height))
            .build()?;
        Ok(())
    }
}

/// Opens the main window once the backend is ready or the probe gives up.
pub struct WindowController<H: WindowHost> {
    host: H,
    probe: HealthProbe,
    health: HealthConfig,
    window: WindowConfig,
}

impl<H: WindowHost> WindowController<H> {
    pub fn new(host: H, probe: HealthProbe, health: HealthConfig, window: WindowConfig) -> Self {
        Self {
            host,
            probe,
            health,
            window,
        }
    }

    /// Wait for the backend, then make sure the main window exists.
    ///
    /// A probe timeout is not an error: the window opens anyway and the UI
    /// shows the backend as disconnected.
    pub async fn launch(&self) -> tauri::Result<ReadinessState> {
        let readiness = match self
            .probe
            .wait_until_ready(self.health.max_attempts, self.health.delay())
            .await
        {
            Ok(()) => ReadinessState::Ready,
            // A slow start may still come up; the liveness monitor reports it
            Err(e) if e.is_transient() => {
                warn!("{e}. Opening window without backend. {}", e.recovery_hint());
                ReadinessState::Unreachable
            }
            Err(e) => {
                error!("{e}. Opening window without backend. {}", e.recovery_hint());
                ReadinessState::Unreachable
            }
        };

        self.ensure_window()?;
        Ok(readiness)
    }

    /// Create the main window if it does not exist. Returns true if created.
    pub fn ensure_window(&self) -> tauri::Result<bool> {
        if self.host.has_window(MAIN_WINDOW_LABEL) {
            return Ok(false);
        }

        self.host.create_window(MAIN_WINDOW_LABEL, &self.window)?;
        info!("Created {MAIN_WINDOW_LABEL} window");
        Ok(true)
    }
}
