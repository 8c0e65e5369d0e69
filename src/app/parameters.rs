// SPDX-License-Identifier: GPL-3.0-only

//! Capture parameter store
//!
//! Single owner of zoom, exposure, flash, torch and facing for one session.
//! Every setter enforces its own rule; nothing else mutates the fields.

use crate::backends::camera::types::{
    CameraFacing, FlashMode, PhotoOptions, PreviewSettings, TorchMode,
};
use crate::constants::{DEFAULT_NEUTRAL_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_RESET_SENTINEL};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureParameters {
    zoom: f64,
    exposure: f64,
    flash: FlashMode,
    torch: TorchMode,
    facing: CameraFacing,
    /// Neutral zoom of the active device, target of the reset sentinel
    neutral_zoom: f64,
}

impl CaptureParameters {
    /// Create the store from the device default zoom
    pub fn new(neutral_zoom: f64, facing: CameraFacing) -> Self {
        let neutral_zoom = clamp_zoom(neutral_zoom).unwrap_or(DEFAULT_NEUTRAL_ZOOM);
        Self {
            zoom: neutral_zoom,
            exposure: 0.0,
            flash: FlashMode::Off,
            torch: TorchMode::Off,
            facing,
            neutral_zoom,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn torch(&self) -> TorchMode {
        self.torch
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn neutral_zoom(&self) -> f64 {
        self.neutral_zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    ///
    /// `ZOOM_RESET_SENTINEL` (-1) resets to the device neutral zoom instead of
    /// being clamped. Non-finite requests are ignored.
    pub fn set_zoom(&mut self, requested: f64) {
        if requested == ZOOM_RESET_SENTINEL {
            self.zoom = self.neutral_zoom;
            debug!(zoom = self.zoom, "Zoom reset to neutral");
            return;
        }
        match clamp_zoom(requested) {
            Some(zoom) => {
                self.zoom = zoom;
                debug!(requested, zoom, "Zoom set");
            }
            None => warn!(requested, "Ignoring non-finite zoom"),
        }
    }

    /// Set the exposure value
    ///
    /// The exposure panel only emits members of the platform option set, so
    /// membership is not checked here.
    pub fn set_exposure(&mut self, exposure: f64) {
        self.exposure = exposure;
        debug!(exposure, "Exposure set");
    }

    pub fn set_flash(&mut self, flash: FlashMode) {
        self.flash = flash;
    }

    pub fn set_torch(&mut self, torch: TorchMode) {
        self.torch = torch;
    }

    pub fn set_facing(&mut self, facing: CameraFacing) {
        self.facing = facing;
    }

    pub fn toggle_flash(&mut self) {
        self.set_flash(self.flash.toggled());
    }

    pub fn toggle_torch(&mut self) {
        self.set_torch(self.torch.toggled());
    }

    pub fn toggle_facing(&mut self) {
        self.set_facing(self.facing.toggled());
    }

    /// Track the neutral zoom of a newly selected device
    ///
    /// The current zoom is left alone: facing and zoom are independent.
    pub fn set_neutral_zoom(&mut self, neutral_zoom: f64) {
        if let Some(neutral) = clamp_zoom(neutral_zoom) {
            self.neutral_zoom = neutral;
        }
    }

    /// Values the live preview is bound with
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            zoom: self.zoom,
            exposure: self.exposure,
            torch: self.torch,
        }
    }

    pub fn photo_options(&self, enable_shutter_sound: bool) -> PhotoOptions {
        PhotoOptions {
            flash: self.flash,
            enable_shutter_sound,
        }
    }

    /// Overlay text shown on top of the preview
    pub fn status_text(&self) -> String {
        format!("Exposure: {} | Zoom: x{}", self.exposure, self.zoom)
    }
}

fn clamp_zoom(zoom: f64) -> Option<f64> {
    zoom.is_finite().then(|| zoom.clamp(MIN_ZOOM, MAX_ZOOM))
}
