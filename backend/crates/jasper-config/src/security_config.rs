use crate::{ConfigError, ConfigErrorResult};

use serde::{Deserialize, Serialize};

const DEFAULT_STYLE_ORIGIN: &str = "https://fonts.googleapis.com";
const DEFAULT_FONT_ORIGIN: &str = "https://fonts.gstatic.com";

/// Tauri's IPC transport origins. The webview cannot reach commands without them.
const IPC_ORIGINS: [&str; 2] = ["ipc:", "http://ipc.localhost"];

/// Content-security settings for the webview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Origins allowed to serve stylesheets for web fonts
    pub style_origins: Vec<String>,
    /// Origins allowed to serve font files
    pub font_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            style_origins: vec![String::from(DEFAULT_STYLE_ORIGIN)],
            font_origins: vec![String::from(DEFAULT_FONT_ORIGIN)],
        }
    }
}

impl SecurityConfig {
    /// Build the Content-Security-Policy attached to every webview response.
    ///
    /// Scripts only load from the app itself; network connections are limited
    /// to the app, the IPC transport and the local backend.
    pub fn content_security_policy(&self, backend_origin: &str) -> String {
        let styles = join_sources(&["'self'", "'unsafe-inline'"], &self.style_origins);
        let fonts = join_sources(&["'self'", "data:"], &self.font_origins);

        let mut connect = vec!["'self'"];
        connect.extend(IPC_ORIGINS);
        connect.push(backend_origin);

        [
            "default-src 'self'".to_string(),
            "script-src 'self'".to_string(),
            format!("style-src {styles}"),
            format!("font-src {fonts}"),
            format!("connect-src {}", connect.join(" ")),
            "img-src 'self' data:".to_string(),
            "object-src 'none'".to_string(),
            "frame-ancestors 'none'".to_string(),
        ]
        .join("; ")
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        for origin in self.style_origins.iter().chain(&self.font_origins) {
            if !origin.starts_with("https://") || origin.contains(char::is_whitespace) {
                return Err(ConfigError::security(format!(
                    "font/style origins must be https:// origins without spaces, got '{origin}'"
                )));
            }
        }

        Ok(())
    }
}

fn join_sources(fixed: &[&str], extra: &[String]) -> String {
    fixed
        .iter()
        .map(|s| s.to_string())
        .chain(extra.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
