// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Selfie camera on the display side
    Front,
    /// Main camera on the rear side
    #[default]
    Back,
}

impl CameraFacing {
    /// The opposite camera
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CameraFacing::Front => "front",
            CameraFacing::Back => "back",
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(CameraFacing::Front),
            "back" | "rear" => Ok(CameraFacing::Back),
            other => Err(format!("unknown camera facing '{}'", other)),
        }
    }
}

/// Flash fired at the moment of capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// Continuous illumination while the preview runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorchMode {
    #[default]
    Off,
    On,
}

impl TorchMode {
    pub fn toggled(self) -> Self {
        match self {
            TorchMode::Off => TorchMode::On,
            TorchMode::On => TorchMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == TorchMode::On
    }
}

/// A capture format advertised by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraFormat {
    /// Highest frame rate the format supports
    pub max_fps: f64,
    /// Still photo width in pixels
    pub photo_width: u32,
    /// Still photo height in pixels
    pub photo_height: u32,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} @ {}fps",
            self.photo_width, self.photo_height, self.max_fps
        )
    }
}

/// Camera hardware descriptor
///
/// Read-only to the session; the backend owns the hardware behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Backend-specific identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Which side of the device the sensor faces
    pub facing: CameraFacing,
    /// Default zoom factor reported by the device
    pub neutral_zoom: f64,
    /// Formats the device can capture in, best first
    pub formats: Vec<CameraFormat>,
}

/// Parameters the live preview is bound with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSettings {
    pub zoom: f64,
    pub exposure: f64,
    pub torch: TorchMode,
}

/// Options for a single still capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhotoOptions {
    pub flash: FlashMode,
    pub enable_shutter_sound: bool,
}

/// File written by the hardware for a successful capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Camera device not found
    DeviceNotFound(String),
    /// Device is open elsewhere or was closed
    DeviceUnavailable(String),
    /// The capture request was rejected
    CaptureRejected(String),
    /// The capture did not complete in time
    Timeout,
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            BackendError::CaptureRejected(msg) => write!(f, "Capture rejected: {}", msg),
            BackendError::Timeout => write!(f, "Capture timed out"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for BackendError {
    fn from(err: image::ImageError) -> Self {
        BackendError::IoError(err.to_string())
    }
}
