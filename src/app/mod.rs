// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture session controller
//!
//! [`CameraSession`] owns everything one capture screen needs for its
//! lifetime: the capture parameters, the visible panel, the opened camera
//! handle and the capture slot. Front-ends feed it [`Message`]s through
//! [`CameraSession::update`] and carry out the returned [`Command`].
//!
//! All mutation happens on the caller's thread, one message at a time. The
//! only suspending work, the hardware capture, leaves the session as a
//! [`PhotoJob`](crate::pipelines::photo::PhotoJob) and comes back as a
//! message.

mod handlers;
pub mod layout;
pub mod panels;
pub mod parameters;
pub mod permissions;
pub mod state;
mod update;

pub use layout::{ArcSide, RadialButton};
pub use panels::{PanelAction, PanelVisibility};
pub use parameters::CaptureParameters;
pub use permissions::{PermissionState, PermissionStatus, should_redirect};
pub use state::{CaptureView, Command, Message, Route, SessionScreen};

use crate::backends::camera::{
    CameraBackend, CameraDevice, CameraFacing, CameraHandle, DeviceSummary,
};
use crate::config::Config;
use crate::constants::{DEFAULT_NEUTRAL_ZOOM, PlatformFamily, ZOOM_OPTIONS};
use crate::errors::CaptureError;
use crate::pipelines::photo::CapturePipeline;
use std::sync::Arc;
use tracing::info;

/// Session options taken from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Decides the exposure option set
    pub platform: PlatformFamily,
    /// Camera selected when the session starts
    pub initial_facing: CameraFacing,
    /// Passed through to every capture
    pub enable_shutter_sound: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            platform: PlatformFamily::current(),
            initial_facing: CameraFacing::Back,
            enable_shutter_sound: false,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            platform: config.platform,
            initial_facing: CameraFacing::Back,
            enable_shutter_sound: config.shutter_sound,
        }
    }
}

/// The capture screen's controller
pub struct CameraSession {
    backend: Arc<dyn CameraBackend>,
    settings: SessionSettings,
    /// Every camera the backend reported at mount
    devices: Vec<CameraDevice>,
    /// Device selected for the current facing
    device: Option<CameraDevice>,
    /// Exclusive handle to `device`, only held while permissions allow it
    camera: Option<Arc<dyn CameraHandle>>,
    params: CaptureParameters,
    panel: PanelVisibility,
    capture: CapturePipeline,
    permissions: PermissionState,
    last_capture_error: Option<CaptureError>,
}

impl CameraSession {
    /// Mount a session: enumerate devices and initialise parameters from
    /// the selected device's defaults
    pub fn new(
        backend: Arc<dyn CameraBackend>,
        permissions: PermissionState,
        settings: SessionSettings,
    ) -> Self {
        let devices = backend.enumerate_cameras();
        info!(count = devices.len(), "Found cameras");

        let neutral_zoom = crate::backends::camera::select_device(&devices, settings.initial_facing)
            .map(|device| device.neutral_zoom)
            .unwrap_or(DEFAULT_NEUTRAL_ZOOM);

        let mut session = Self {
            backend,
            settings,
            devices,
            device: None,
            camera: None,
            params: CaptureParameters::new(neutral_zoom, settings.initial_facing),
            panel: PanelVisibility::None,
            capture: CapturePipeline::new(settings.enable_shutter_sound),
            permissions,
            last_capture_error: None,
        };
        session.refresh_camera();
        session
    }

    pub fn parameters(&self) -> &CaptureParameters {
        &self.params
    }

    pub fn panel(&self) -> PanelVisibility {
        self.panel
    }

    pub fn permissions(&self) -> PermissionState {
        self.permissions
    }

    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    /// Opened camera handle, if any
    pub fn camera(&self) -> Option<&Arc<dyn CameraHandle>> {
        self.camera.as_ref()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    /// Error of the most recent failed capture attempt
    pub fn last_capture_error(&self) -> Option<&CaptureError> {
        self.last_capture_error.as_ref()
    }

    pub fn platform(&self) -> PlatformFamily {
        self.settings.platform
    }

    pub fn zoom_options(&self) -> &'static [f64] {
        &ZOOM_OPTIONS
    }

    pub fn exposure_options(&self) -> &'static [f64] {
        self.settings.platform.exposure_options()
    }

    /// Zoom panel buttons for a window of the given size
    pub fn zoom_buttons(&self, width: f64, height: f64) -> Vec<RadialButton> {
        layout::zoom_layout(self.zoom_options(), width, height)
    }

    /// Exposure panel buttons for a window of the given size
    pub fn exposure_buttons(&self, width: f64, height: f64) -> Vec<RadialButton> {
        layout::exposure_layout(self.exposure_options(), width, height)
    }

    /// Whether the permission gate currently blocks the session
    pub fn should_redirect(&self) -> bool {
        should_redirect(&self.permissions)
    }

    /// What the capture screen renders right now
    pub fn screen(&self) -> SessionScreen {
        if self.should_redirect() {
            return SessionScreen::Redirect(Route::Permissions);
        }
        let Some(device) = &self.device else {
            return SessionScreen::NoDevice(self.params.facing());
        };
        SessionScreen::Capture(CaptureView {
            device: DeviceSummary::from_device(device),
            status_text: self.params.status_text(),
            capturing: self.capture.is_capturing(),
        })
    }
}
