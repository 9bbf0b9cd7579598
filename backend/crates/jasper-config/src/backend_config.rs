use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ENTRY_SCRIPT, DEFAULT_HOST, DEFAULT_PORT, MIN_PORT,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Where the Python worker lives and listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Loopback address the worker binds to
    pub host: String,
    pub port: u16,
    /// Entry script, relative to the application root
    pub entry_script: String,
    /// Override for the application root (defaults to the resource dir or cwd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_root: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            entry_script: String::from(DEFAULT_ENTRY_SCRIPT),
            app_root: None,
        }
    }
}

impl BackendConfig {
    /// Base URL of the worker, e.g. `http://127.0.0.1:5123`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host != DEFAULT_HOST && self.host != "localhost" {
            return Err(ConfigError::backend(format!(
                "backend.host must be {DEFAULT_HOST} or localhost, got {}",
                self.host
            )));
        }

        if self.port < MIN_PORT {
            return Err(ConfigError::backend(format!(
                "backend.port must be >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        let script = Path::new(&self.entry_script);
        if self.entry_script.is_empty()
            || script.is_absolute()
            || self.entry_script.contains("..")
        {
            return Err(ConfigError::backend(
                "backend.entry_script must be a relative path without '..'",
            ));
        }

        Ok(())
    }
}
