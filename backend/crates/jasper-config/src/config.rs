use crate::{
    BackendConfig, ConfigError, ConfigErrorResult, HealthConfig, LoggingConfig, RetryConfig,
    SecurityConfig, SupervisorConfig, WindowConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "JASPER_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".jasper";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub supervisor: SupervisorConfig,
    pub health: HealthConfig,
    pub retry: RetryConfig,
    pub window: WindowConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the default config directory.
    ///
    /// Loading order:
    /// 1. JASPER_CONFIG_DIR env var, else ./.jasper/
    /// 2. config.toml if it exists, else defaults
    /// 3. JASPER_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load config from `dir/config.toml` (defaults if the file is missing),
    /// then apply environment overrides.
    pub fn load_from(dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load config from `dir`, writing a default config.toml on first run.
    pub fn load_or_create(dir: &Path) -> ConfigErrorResult<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        if !dir.join(CONFIG_FILENAME).exists() {
            Config::default().save(dir)?;
            info!("Wrote default config to {}", dir.join(CONFIG_FILENAME).display());
        }

        Self::load_from(dir)
    }

    /// Save config to `dir/config.toml` atomically.
    ///
    /// Writes to a temp file then renames so an interrupted write never
    /// leaves a truncated config behind.
    pub fn save(&self, dir: &Path) -> ConfigErrorResult<()> {
        let config_path = dir.join(CONFIG_FILENAME);
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::TomlSerialize {
            path: config_path.clone(),
            source: e,
        })?;

        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| ConfigError::Io {
            path: temp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: JASPER_CONFIG_DIR env var > ./.jasper/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Config directory for a host that has its own data directory.
    /// Priority: JASPER_CONFIG_DIR env var > `fallback`
    pub fn config_dir_or(fallback: &Path) -> PathBuf {
        std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| fallback.to_path_buf())
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.backend.validate()?;
        self.supervisor.validate()?;
        self.health.validate()?;
        self.retry.validate()?;
        self.window.validate()?;
        self.security.validate()?;

        Ok(())
    }

    /// Content-Security-Policy for the webview, scoped to this backend.
    pub fn content_security_policy(&self) -> String {
        self.security
            .content_security_policy(&self.backend.base_url())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  backend: {} (entry: {})",
            self.backend.base_url(),
            self.backend.entry_script
        );
        info!(
            "  supervisor: max_restarts={}, delay={}ms, shutdown={}ms",
            self.supervisor.max_restarts,
            self.supervisor.restart_delay_ms,
            self.supervisor.shutdown_timeout_ms
        );
        info!(
            "  health: attempts={}, delay={}ms, liveness={}s",
            self.health.max_attempts, self.health.delay_ms, self.health.liveness_interval_secs
        );
        info!(
            "  retry: max_retries={}, base={}ms (linear)",
            self.retry.max_retries, self.retry.base_delay_ms
        );
        info!("  logging: {}", self.logging.level);
    }

    fn apply_env_overrides(&mut self) {
        // Backend
        Self::apply_env_string("JASPER_BACKEND_HOST", &mut self.backend.host);
        Self::apply_env_parse("JASPER_BACKEND_PORT", &mut self.backend.port);
        Self::apply_env_string(
            "JASPER_BACKEND_ENTRY_SCRIPT",
            &mut self.backend.entry_script,
        );
        Self::apply_env_option_string("JASPER_APP_ROOT", &mut self.backend.app_root);

        // Supervisor
        Self::apply_env_parse(
            "JASPER_SUPERVISOR_MAX_RESTARTS",
            &mut self.supervisor.max_restarts,
        );
        Self::apply_env_parse(
            "JASPER_SUPERVISOR_RESTART_DELAY_MS",
            &mut self.supervisor.restart_delay_ms,
        );
        Self::apply_env_parse(
            "JASPER_SUPERVISOR_SHUTDOWN_TIMEOUT_MS",
            &mut self.supervisor.shutdown_timeout_ms,
        );

        // Health
        Self::apply_env_parse("JASPER_HEALTH_MAX_ATTEMPTS", &mut self.health.max_attempts);
        Self::apply_env_parse("JASPER_HEALTH_DELAY_MS", &mut self.health.delay_ms);
        Self::apply_env_parse(
            "JASPER_HEALTH_REQUEST_TIMEOUT_MS",
            &mut self.health.request_timeout_ms,
        );
        Self::apply_env_parse(
            "JASPER_HEALTH_LIVENESS_INTERVAL_SECS",
            &mut self.health.liveness_interval_secs,
        );

        // Retry
        Self::apply_env_parse("JASPER_RETRY_MAX_RETRIES", &mut self.retry.max_retries);
        Self::apply_env_parse("JASPER_RETRY_BASE_DELAY_MS", &mut self.retry.base_delay_ms);

        // Logging
        Self::apply_env_parse("JASPER_LOG_LEVEL", &mut self.logging.level);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
