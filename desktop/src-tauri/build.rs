fn main() {
    // Only these commands are reachable from the webview; capabilities/default.json grants them.
    let manifest = tauri_build::AppManifest::new().commands(&[
        "open_file",
        "get_backend_url",
        "get_platform",
    ]);

    tauri_build::try_build(tauri_build::Attributes::new().app_manifest(manifest))
        .expect("failed to run tauri-build");
}
