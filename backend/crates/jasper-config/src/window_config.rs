use crate::{ConfigError, ConfigErrorResult};

use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "Jasper";
const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 860;
const DEFAULT_MIN_WIDTH: u32 = 900;
const DEFAULT_MIN_HEIGHT: u32 = 600;
const MIN_DIMENSION: u32 = 320;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from(DEFAULT_TITLE),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.min_width < MIN_DIMENSION || self.min_height < MIN_DIMENSION {
            return Err(ConfigError::config(format!(
                "window.min_width and window.min_height must be >= {MIN_DIMENSION}"
            )));
        }

        if self.width < self.min_width || self.height < self.min_height {
            return Err(ConfigError::config(format!(
                "window size {}x{} is smaller than the minimum {}x{}",
                self.width, self.height, self.min_width, self.min_height
            )));
        }

        Ok(())
    }
}
