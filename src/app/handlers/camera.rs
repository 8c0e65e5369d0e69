// SPDX-License-Identifier: GPL-3.0-only

//! Camera selection and capture parameter handlers
//!
//! Handles facing changes, device (re)opening, and every parameter setter.
//! Each parameter change re-binds the live preview.

use crate::app::CameraSession;
use crate::app::state::Command;
use crate::backends::camera::select_device;
use tracing::{error, info, warn};

impl CameraSession {
    // =========================================================================
    // Camera Selection
    // =========================================================================

    /// Open or release the camera to match the permission gate and facing
    pub(crate) fn refresh_camera(&mut self) {
        if self.should_redirect() {
            if self.camera.take().is_some() {
                info!("Permissions revoked, releasing camera");
            }
            return;
        }
        self.activate_device();
    }

    /// Select the device for the current facing and open it
    fn activate_device(&mut self) {
        // Release the old handle before opening another device
        self.camera = None;

        let facing = self.params.facing();
        let device = match select_device(&self.devices, facing) {
            Ok(device) => device.clone(),
            Err(e) => {
                warn!(error = %e, "Rendering empty camera state");
                self.device = None;
                return;
            }
        };

        self.params.set_neutral_zoom(device.neutral_zoom);
        match self.backend.open(&device) {
            Ok(handle) => {
                info!(device = %device.name, %facing, "Camera opened");
                self.camera = Some(handle);
            }
            Err(e) => {
                error!(device = %device.name, error = %e, "Failed to open camera");
            }
        }
        self.device = Some(device);
        self.bind_preview();
    }

    /// Push the current zoom/exposure/torch to the live preview
    fn bind_preview(&self) {
        let Some(camera) = &self.camera else {
            return;
        };
        if let Err(e) = camera.bind_preview(self.params.preview_settings()) {
            warn!(error = %e, "Failed to bind preview settings");
        }
    }

    pub(crate) fn handle_switch_camera(&mut self) -> Command {
        self.params.toggle_facing();
        info!(facing = %self.params.facing(), "Switching camera");
        self.refresh_camera();
        Command::None
    }

    // =========================================================================
    // Parameter Setters
    // =========================================================================

    pub(crate) fn handle_set_zoom(&mut self, zoom: f64) -> Command {
        self.params.set_zoom(zoom);
        self.bind_preview();
        Command::None
    }

    pub(crate) fn handle_set_exposure(&mut self, exposure: f64) -> Command {
        self.params.set_exposure(exposure);
        self.bind_preview();
        Command::None
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Command {
        self.params.toggle_flash();
        info!(flash = ?self.params.flash(), "Flash toggled");
        Command::None
    }

    pub(crate) fn handle_toggle_torch(&mut self) -> Command {
        self.params.toggle_torch();
        info!(torch = ?self.params.torch(), "Torch toggled");
        self.bind_preview();
        Command::None
    }
}
