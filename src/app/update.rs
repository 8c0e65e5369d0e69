// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` routes every message to a handler in `handlers`:
//!
//! - `handlers::ui`: panel visibility, permissions
//! - `handlers::camera`: facing, device opening, parameter setters
//! - `handlers::capture`: capture dispatch and result handling

use crate::app::CameraSession;
use crate::app::panels::PanelAction;
use crate::app::state::{Command, Message};

impl CameraSession {
    /// Main message handler
    pub fn update(&mut self, message: Message) -> Command {
        match message {
            // ===== Panels =====
            Message::ShowZoomControls => self.handle_panel_action(PanelAction::ShowZoom),
            Message::CloseZoomControls => self.handle_panel_action(PanelAction::CloseZoom),
            Message::ShowExposureControls => self.handle_panel_action(PanelAction::ShowExposure),
            Message::CloseExposureControls => self.handle_panel_action(PanelAction::CloseExposure),

            // ===== Parameters =====
            Message::SetZoom(zoom) => self.handle_set_zoom(zoom),
            Message::SetExposure(exposure) => self.handle_set_exposure(exposure),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleTorch => self.handle_toggle_torch(),
            Message::SwitchCamera => self.handle_switch_camera(),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoCaptured(result) => self.handle_photo_captured(result),

            // ===== System =====
            Message::PermissionsChanged(permissions) => {
                self.handle_permissions_changed(permissions)
            }
            Message::OpenGallery => Command::OpenGallery,
        }
    }
}
