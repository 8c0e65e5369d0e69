// SPDX-License-Identifier: GPL-3.0-only

//! Panel and system handlers

use crate::app::CameraSession;
use crate::app::panels::PanelAction;
use crate::app::permissions::PermissionState;
use crate::app::state::{Command, Route};
use tracing::info;

impl CameraSession {
    pub(crate) fn handle_panel_action(&mut self, action: PanelAction) -> Command {
        self.panel = self.panel.apply(action);
        Command::None
    }

    pub(crate) fn handle_permissions_changed(&mut self, permissions: PermissionState) -> Command {
        info!(
            camera = permissions.camera.display_name(),
            microphone = permissions.microphone.display_name(),
            "Permissions changed"
        );
        self.permissions = permissions;
        self.refresh_camera();

        if self.should_redirect() {
            Command::Navigate(Route::Permissions)
        } else {
            Command::None
        }
    }
}
