mod commands;
mod ipc_error;
mod logging;
mod supervisor;
mod window;

use logging::setup_logging;
use supervisor::{
    HealthProbe, InterpreterLocator, LivenessMonitor, ProcessSupervisor, resolve_app_root,
};
use window::{MAIN_WINDOW_LABEL, WindowController};

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;

use jasper_config::Config;
use tauri::utils::config::Csp;
use tauri::{AppHandle, Manager, RunEvent};
use tracing::{error, info, warn};

const TAURI_DATA_DIR: &str = ".tauri";

type MainWindowController = WindowController<AppHandle>;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let mut context = tauri::generate_context!();

    // Tauri's app data dir is <data dir>/<identifier>; it is needed before the
    // app exists because the CSP must be installed into the context first.
    let app_data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(&context.config().identifier);
    let tauri_dir = Config::config_dir_or(&app_data_dir.join(TAURI_DATA_DIR));

    let (config, config_error) = match load_config(&tauri_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let logs_dir = match setup_logging(&tauri_dir, &config.logging) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            tauri_dir.join("logs")
        }
    };

    info!("Starting Jasper v{}", env!("CARGO_PKG_VERSION"));
    info!("Config directory: {:?}", tauri_dir);
    info!("Log directory: {:?}", logs_dir);
    if let Some(e) = config_error {
        warn!("Invalid configuration, using defaults: {e}");
    }
    config.log_summary();

    let csp = config.content_security_policy();
    info!("Content-Security-Policy: {csp}");
    context.config_mut().app.security.csp = Some(Csp::Policy(csp));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            // Focus existing window on second instance attempt
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                window.show().ok();
                window.set_focus().ok();
            }
        }))
        .plugin(tauri_plugin_dialog::init())
        .manage(config.clone())
        .setup(move |app| {
            let resource_dir = app.path().resource_dir().ok();
            let app_root = resolve_app_root(
                config.backend.app_root.as_deref(),
                resource_dir.as_deref(),
                &config.backend.entry_script,
            );
            info!("Application root: {:?}", app_root);

            let locator = InterpreterLocator::new(app_root, resource_dir, &config.backend.entry_script);
            let supervisor = Arc::new(
                ProcessSupervisor::new(locator, config.supervisor.clone())
                    .with_env("JASPER_BACKEND_HOST", &config.backend.host)
                    .with_env("JASPER_BACKEND_PORT", config.backend.port.to_string()),
            );
            app.manage(supervisor.clone());

            // Setup signal handlers for graceful shutdown on Unix
            #[cfg(unix)]
            {
                let app_handle = app.handle().clone();
                std::thread::spawn(move || {
                    use signal_hook::consts::{SIGINT, SIGTERM};
                    use signal_hook::iterator::Signals;

                    let mut signals = match Signals::new([SIGINT, SIGTERM]) {
                        Ok(s) => s,
                        Err(e) => {
                            error!("Failed to register signal handlers: {e}");
                            return;
                        }
                    };

                    if let Some(sig) = signals.forever().next() {
                        info!("Received signal {sig}, shutting down...");
                        stop_worker(&app_handle);
                        std::process::exit(0);
                    }
                });
            }

            let controller = Arc::new(WindowController::new(
                app.handle().clone(),
                HealthProbe::from_config(&config)?,
                config.health.clone(),
                config.window.clone(),
            ));
            app.manage(controller.clone());

            let liveness = LivenessMonitor::new(
                HealthProbe::from_config(&config)?,
                supervisor.clone(),
                config.health.liveness_interval(),
            );

            // Spawn the worker, open the window once it answers (or the probe
            // gives up), then keep reporting liveness to the UI
            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                supervisor.start().await;

                match controller.launch().await {
                    Ok(readiness) => info!("Main window opened (backend {readiness:?})"),
                    Err(e) => {
                        error!("Failed to create main window: {e}");
                        app_handle.exit(1);
                        return;
                    }
                }

                liveness.run(app_handle).await;
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::open_file,
            commands::get_backend_url,
            commands::get_platform,
        ])
        .build(context)
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { api, code, .. } => {
                // Closing the last window keeps the app alive in the macOS dock
                if cfg!(target_os = "macos") && code.is_none() {
                    api.prevent_exit();
                    return;
                }

                info!("Exit requested (code: {:?})", code);
                api.prevent_exit();
                stop_worker(app_handle);
                std::process::exit(code.unwrap_or(0));
            }
            RunEvent::Exit => stop_worker(app_handle),
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows: false,
                ..
            } => {
                if let Some(controller) = app_handle.try_state::<Arc<MainWindowController>>()
                    && let Err(e) = controller.ensure_window()
                {
                    error!("Failed to recreate main window: {e}");
                }
            }
            _ => {}
        });
}

fn load_config(dir: &std::path::Path) -> jasper_config::ConfigErrorResult<Config> {
    let config = Config::load_or_create(dir)?;
    config.validate()?;
    Ok(config)
}

/// Stop the worker before the process exits. Idempotent.
fn stop_worker(app_handle: &AppHandle) {
    if let Some(supervisor) = app_handle.try_state::<Arc<ProcessSupervisor>>() {
        info!("Stopping worker before exit...");
        let supervisor = supervisor.inner().clone();
        tauri::async_runtime::block_on(async move { supervisor.stop().await });
    }
}
