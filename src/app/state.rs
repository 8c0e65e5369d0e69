// SPDX-License-Identifier: GPL-3.0-only

//! Session state, messages and commands

use crate::app::permissions::PermissionState;
use crate::backends::camera::{CameraFacing, DeviceSummary, PhotoFile};
use crate::errors::CaptureError;
use crate::pipelines::photo::{CapturedMedia, PhotoJob};

/// Messages emitted by the front-end into the session
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Panels =====
    ShowZoomControls,
    CloseZoomControls,
    ShowExposureControls,
    CloseExposureControls,

    // ===== Parameters =====
    /// Zoom factor picked on the zoom panel (-1 resets to neutral)
    SetZoom(f64),
    /// Exposure value picked on the exposure panel
    SetExposure(f64),
    ToggleFlash,
    ToggleTorch,
    /// Switch between the front and back camera
    SwitchCamera,

    // ===== Capture =====
    Capture,
    PhotoCaptured(Result<PhotoFile, CaptureError>),

    // ===== System =====
    PermissionsChanged(PermissionState),
    OpenGallery,
}

/// Screens the navigation subsystem can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Permission request screen
    Permissions,
    /// Review screen for a captured photo
    Media(CapturedMedia),
}

/// Work the front-end must perform after an update
#[derive(Debug)]
pub enum Command {
    None,
    /// Ask the navigation subsystem to show another screen
    Navigate(Route),
    /// Run the job and feed its result back as [`Message::PhotoCaptured`]
    Capture(PhotoJob),
    /// Open the system photo gallery
    OpenGallery,
}

impl Command {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

/// What the capture screen should render
#[derive(Debug, Clone, PartialEq)]
pub enum SessionScreen {
    /// Permissions are missing; nothing of the capture UI is rendered
    Redirect(Route),
    /// No camera for the selected facing
    NoDevice(CameraFacing),
    /// Live preview with controls
    Capture(CaptureView),
}

/// Data for rendering the capture screen
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureView {
    pub device: DeviceSummary,
    pub status_text: String,
    pub capturing: bool,
}
