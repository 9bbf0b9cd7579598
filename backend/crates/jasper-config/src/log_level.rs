use crate::DEFAULT_LOG_LEVEL;

use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Log verbosity from `[logging] level`.
///
/// Parsing never fails: unknown or non-string values fall back to `info`,
/// so a typo in the config file cannot stop the app from starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub LevelFilter);

impl LogLevel {
    pub fn parse_lenient(value: &str) -> Self {
        Self(value.trim().parse().unwrap_or(DEFAULT_LOG_LEVEL))
    }

    /// Lowercase name, as accepted by `EnvFilter` directives.
    pub fn directive(&self) -> String {
        self.0.as_str().to_ascii_lowercase()
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(DEFAULT_LOG_LEVEL)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directive())
    }
}

impl Deref for LogLevel {
    type Target = LevelFilter;

    fn deref(&self) -> &LevelFilter {
        &self.0
    }
}

impl FromStr for LogLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(Self::parse_lenient(s))
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)
            .map(|s| Self::parse_lenient(&s))
            .unwrap_or_default())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.directive())
    }
}
