// SPDX-License-Identifier: GPL-3.0-only

//! Control panel state machine
//!
//! At most one adjustment panel replaces the primary button row at a time.
//! The two "show" affordances only exist while no panel is open, so only
//! the transitions below are reachable:
//!
//! ```text
//!            show_zoom              show_exposure
//!  ZoomPanel ◄────────── None ──────────────► ExposurePanel
//!            ──────────►      ◄──────────────
//!            close_zoom              close_exposure
//! ```

use tracing::debug;

/// Which overlay panel is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVisibility {
    /// Primary button row is shown
    #[default]
    None,
    /// Zoom buttons on the left arc
    ZoomPanel,
    /// Exposure buttons on the right arc
    ExposurePanel,
}

/// User actions that drive panel visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ShowZoom,
    CloseZoom,
    ShowExposure,
    CloseExposure,
}

impl PanelVisibility {
    /// Apply an action and return the resulting state
    ///
    /// Actions whose affordance is not rendered in the current state leave
    /// the state unchanged.
    pub fn apply(self, action: PanelAction) -> Self {
        let next = match (self, action) {
            (PanelVisibility::None, PanelAction::ShowZoom) => PanelVisibility::ZoomPanel,
            (PanelVisibility::None, PanelAction::ShowExposure) => PanelVisibility::ExposurePanel,
            (PanelVisibility::ZoomPanel, PanelAction::CloseZoom) => PanelVisibility::None,
            (PanelVisibility::ExposurePanel, PanelAction::CloseExposure) => PanelVisibility::None,
            (state, _) => {
                debug!(?state, ?action, "Panel action not available, ignoring");
                state
            }
        };
        if next != self {
            debug!(from = ?self, to = ?next, "Panel visibility changed");
        }
        next
    }
}

/// Label of a zoom button, e.g. `2x`
pub fn zoom_label(zoom: f64) -> String {
    format!("{}x", zoom)
}

/// Label of an exposure button; positive values carry a `+`
pub fn exposure_label(exposure: f64) -> String {
    if exposure > 0.0 {
        format!("+{}", exposure)
    } else {
        format!("{}", exposure)
    }
}
