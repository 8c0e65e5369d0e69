// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Read once at start-up from `<config dir>/obscura/config.json`. The file
//! is never written back by the application: capture parameters always
//! start from device defaults.

use crate::app::permissions::PermissionState;
use crate::constants::{PlatformFamily, app_info};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Logical window size used for layout when no real window exists
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl Default for WindowSize {
    fn default() -> Self {
        // Typical phone portrait viewport
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform family deciding the exposure option set
    pub platform: PlatformFamily,
    /// Gallery directory photos are saved into from the review screen
    pub photo_directory: Option<PathBuf>,
    /// Directory the camera writes fresh captures to
    pub capture_directory: Option<PathBuf>,
    /// Play the shutter sound on capture
    pub shutter_sound: bool,
    /// Logical window size for the `layout` command
    pub window: WindowSize,
    /// Permission snapshot reported by the built-in permission source
    pub permissions: PermissionState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: PlatformFamily::current(),
            photo_directory: None,
            capture_directory: None,
            shutter_sound: false,
            window: WindowSize::default(),
            permissions: PermissionState::granted(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_NAME).join("config.json"))
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory on this system, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Config(format!("{}: {}", path.display(), e))),
        };
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(AppError::from)
    }

    /// Gallery directory, defaulting to `<Pictures>/obscura`
    pub fn photo_directory(&self) -> PathBuf {
        self.photo_directory.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(app_info::APP_NAME)
        })
    }

    /// Capture directory, defaulting to `<cache>/obscura/captures`
    pub fn capture_directory(&self) -> PathBuf {
        self.capture_directory.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(app_info::APP_NAME)
                .join("captures")
        })
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_file(&self) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_info::APP_NAME)
            .join("obscura.log")
    }
}
