use crate::LogLevel;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`.
    ///
    /// The desktop crate and the forwarded worker output follow the
    /// configured level; everything else stays at `warn` unless the
    /// configured level is quieter.
    pub fn filter_directive(&self) -> String {
        let level = self.level.directive();
        let base = if *self.level > log::LevelFilter::Warn {
            "warn".to_string()
        } else {
            level.clone()
        };
        format!("{base},jasper_desktop={level},jasper_client={level},worker={level}")
    }
}
