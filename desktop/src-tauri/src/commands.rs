//! Tauri IPC commands exposed to the webview.
//!
//! These three commands are the only host functionality the UI can reach.

use crate::ipc_error::{IpcError, Result as IpcResult};

use std::path::PathBuf;

use jasper_config::Config;
use serde::Serialize;
use tauri::State;
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;
use tracing::error;

/// Filters offered by the open-file dialog, in order.
pub const FILE_FILTERS: [(&str, &[&str]); 2] = [
    ("Text Files", &["txt", "md", "csv", "json"]),
    ("All Files", &["*"]),
];

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedFile {
    pub path: String,
    pub content: String,
}

/// Show the native open dialog and return the chosen file's text.
///
/// Resolves to `null` when the dialog is cancelled.
#[tauri::command]
pub async fn open_file(app: tauri::AppHandle) -> Result<Option<OpenedFile>, String> {
    let (tx, rx) = oneshot::channel();

    let mut dialog = app.dialog().file();
    for (name, extensions) in FILE_FILTERS {
        dialog = dialog.add_filter(name, extensions);
    }
    dialog.pick_file(move |selected| {
        let _ = tx.send(selected);
    });

    let selected = rx
        .await
        .map_err(|_| to_command_error(IpcError::dialog("dialog closed without a result")))?;

    let path = match selected {
        Some(file) => Some(
            file.into_path()
                .map_err(|e| to_command_error(IpcError::dialog(e.to_string())))?,
        ),
        None => None,
    };

    read_selected_file(path).await.map_err(to_command_error)
}

/// Base URL of the backend REST API.
#[tauri::command]
pub fn get_backend_url(config: State<'_, Config>) -> String {
    config.backend.base_url()
}

/// Host operating system (`std::env::consts::OS`).
#[tauri::command]
pub fn get_platform() -> String {
    std::env::consts::OS.to_string()
}

/// Read the dialog result. `None` (cancelled) is not an error.
pub(crate) async fn read_selected_file(path: Option<PathBuf>) -> IpcResult<Option<OpenedFile>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| IpcError::read_file(path.clone(), e))?;

    Ok(Some(OpenedFile {
        path: path.display().to_string(),
        content,
    }))
}

fn to_command_error(e: IpcError) -> String {
    error!("open_file failed: {e}");
    format!("{e}\n\nHint: {}", e.recovery_hint())
}
