mod backend_config;
mod config;
mod error;
mod health_config;
mod log_level;
mod logging_config;
mod retry_config;
mod security_config;
mod supervisor_config;
mod window_config;

#[cfg(test)]
mod tests;

pub use backend_config::BackendConfig;
pub use config::{CONFIG_FILENAME, Config};
pub use error::{ConfigError, ConfigErrorResult};
pub use health_config::HealthConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use retry_config::RetryConfig;
pub use security_config::SecurityConfig;
pub use supervisor_config::SupervisorConfig;
pub use window_config::WindowConfig;

// Backend
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5123;
pub const DEFAULT_ENTRY_SCRIPT: &str = "backend/server.py";
pub const HEALTH_PATH: &str = "/api/health";
pub const MIN_PORT: u16 = 1024;

// Logging
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
