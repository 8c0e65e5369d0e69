// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Lowest zoom factor the parameter store accepts
pub const MIN_ZOOM: f64 = 1.0;

/// Highest zoom factor the parameter store accepts
pub const MAX_ZOOM: f64 = 128.0;

/// Zoom used when no device has reported its neutral zoom yet
pub const DEFAULT_NEUTRAL_ZOOM: f64 = 1.0;

/// Requested zoom value meaning "reset to the device neutral zoom"
pub const ZOOM_RESET_SENTINEL: f64 = -1.0;

/// Fixed zoom factors offered by the zoom panel
pub const ZOOM_OPTIONS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

/// Exposure steps used by Android camera stacks
pub const EXPOSURE_OPTIONS_ANDROID: [f64; 5] = [-10.0, -5.0, 0.0, 5.0, 10.0];

/// Exposure steps (EV) used by Apple camera stacks
pub const EXPOSURE_OPTIONS_APPLE: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

/// Platform family, which decides the discrete exposure scale
///
/// Android reports exposure compensation in wide integer steps while the
/// Apple stack uses EV in a narrow band. Every non-Android target uses the
/// narrow band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    /// Android devices
    Android,
    /// iOS and every other target
    Apple,
}

impl PlatformFamily {
    /// Platform family of the build target
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            PlatformFamily::Android
        } else {
            PlatformFamily::Apple
        }
    }

    /// Discrete exposure values the exposure panel may emit
    pub fn exposure_options(self) -> &'static [f64] {
        match self {
            PlatformFamily::Android => &EXPOSURE_OPTIONS_ANDROID,
            PlatformFamily::Apple => &EXPOSURE_OPTIONS_APPLE,
        }
    }

    /// Get display name for the platform family
    pub fn display_name(self) -> &'static str {
        match self {
            PlatformFamily::Android => "Android",
            PlatformFamily::Apple => "Apple",
        }
    }
}

impl Default for PlatformFamily {
    fn default() -> Self {
        Self::current()
    }
}

/// Application information utilities
pub mod app_info {
    /// Application name used for config, cache and gallery directories
    pub const APP_NAME: &str = "obscura";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
