// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Optional JSON file under the platform config dir. Missing or
//! unreadable config falls back to defaults; the app never fails to
//! start because of it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where logs and stills are written
    pub capture_dir: PathBuf,
    /// Inter-frame delay in milliseconds
    pub frame_interval_ms: u64,
    /// Assumed resolution for still depth files (see `measure_still`)
    pub still_width: u32,
    pub still_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_dir: storage::default_capture_dir(),
            frame_interval_ms: crate::constants::FRAME_INTERVAL.as_millis() as u64,
            still_width: crate::constants::DEFAULT_STILL_WIDTH,
            still_height: crate::constants::DEFAULT_STILL_HEIGHT,
        }
    }
}

impl Config {
    /// Path of the config file (`<config dir>/depthcam/config.json`)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("depthcam").join("config.json"))
    }

    /// Load the config, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.frame_interval_ms, 33);
        assert_eq!(config.still_width, 640);
        assert_eq!(config.still_height, 480);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"frame_interval_ms": 50}"#).unwrap();
        assert_eq!(config.frame_interval_ms, 50);
        assert_eq!(config.still_width, 640);
    }
}
