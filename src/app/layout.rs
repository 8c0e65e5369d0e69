// SPDX-License-Identifier: GPL-3.0-only

//! Radial button layout
//!
//! Places the discrete option buttons of the zoom and exposure panels along
//! partial arcs. Pure functions of the option list and window size; the
//! layout is recomputed on every render and never stored.
//!
//! The two panels are tuned independently. The zoom arc is anchored on the
//! left, starts at 0 rad and uses a halved sweep with no phase shift, while
//! the exposure arc is anchored on the right and starts at the top (-π/2).
//! The asymmetry is kept exactly as tuned; do not merge the two formulas.

use serde::Serialize;
use std::f64::consts::PI;

/// Fraction of the smaller window dimension used as the arc radius
pub const RADIUS_SCALE: f64 = 0.35;
/// Vertical margin subtracted from the height before picking the radius
pub const RADIUS_VERTICAL_MARGIN: f64 = 100.0;

/// Zoom arc: `i / N / ZOOM_SWEEP_DIVISOR` of a turn
pub const ZOOM_SWEEP_DIVISOR: f64 = 3.0;
/// Zoom arc: the turn is additionally divided by this
pub const ZOOM_PHASE_DIVISOR: f64 = 2.0;
/// Zoom arc: distance of the arc centre from the left edge
pub const ZOOM_X_OFFSET: f64 = 40.0;
/// Zoom arc: the arc centre sits at `height / ZOOM_Y_DIVISOR`
pub const ZOOM_Y_DIVISOR: f64 = 4.0;

/// Exposure arc: `i / N / EXPOSURE_SWEEP_DIVISOR` of a turn (120° in total)
pub const EXPOSURE_SWEEP_DIVISOR: f64 = 3.0;
/// Exposure arc: start angle, pointing up
pub const EXPOSURE_PHASE: f64 = -PI / 2.0;
/// Exposure arc: distance of the arc centre from the right edge
pub const EXPOSURE_EDGE_INSET: f64 = 90.0;
/// Exposure arc: the arc centre sits at `height / EXPOSURE_Y_DIVISOR`
pub const EXPOSURE_Y_DIVISOR: f64 = 4.0;

/// Diameter of a round panel button
pub const BUTTON_SIZE: f64 = 50.0;
/// Inset of the close button from its anchored edge
pub const CLOSE_BUTTON_INSET: f64 = 30.0;

/// Edge a panel's arc is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcSide {
    /// Zoom panel
    Left,
    /// Exposure panel
    Right,
}

/// A positioned option button (top-left corner in window coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialButton {
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// Position of a panel's close button (top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloseButton {
    pub x: f64,
    pub y: f64,
}

/// Arc radius for a window
///
/// May be zero or negative for very short windows; the layout is still
/// computed in that case, the buttons just collapse onto or mirror around
/// the arc centre.
pub fn arc_radius(width: f64, height: f64) -> f64 {
    width.min(height - RADIUS_VERTICAL_MARGIN) * RADIUS_SCALE
}

/// Lay out `values` on the arc of the given side
pub fn radial_layout(values: &[f64], width: f64, height: f64, side: ArcSide) -> Vec<RadialButton> {
    match side {
        ArcSide::Left => zoom_layout(values, width, height),
        ArcSide::Right => exposure_layout(values, width, height),
    }
}

/// Left-anchored arc used by the zoom panel
pub fn zoom_layout(values: &[f64], width: f64, height: f64) -> Vec<RadialButton> {
    let radius = arc_radius(width, height);
    let count = values.len() as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let angle = (i as f64 / count / ZOOM_SWEEP_DIVISOR) * 2.0 * PI / ZOOM_PHASE_DIVISOR;
            RadialButton {
                value,
                x: angle.cos() * radius + ZOOM_X_OFFSET,
                y: angle.sin() * radius + height / ZOOM_Y_DIVISOR,
            }
        })
        .collect()
}

/// Right-anchored arc used by the exposure panel
pub fn exposure_layout(values: &[f64], width: f64, height: f64) -> Vec<RadialButton> {
    let radius = arc_radius(width, height);
    let count = values.len() as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let angle = (i as f64 / count / EXPOSURE_SWEEP_DIVISOR) * 2.0 * PI + EXPOSURE_PHASE;
            RadialButton {
                value,
                x: width - angle.cos() * radius - EXPOSURE_EDGE_INSET,
                y: angle.sin() * radius + height / EXPOSURE_Y_DIVISOR,
            }
        })
        .collect()
}

/// Close button of the panel anchored on `side`
pub fn close_button(width: f64, height: f64, side: ArcSide) -> CloseButton {
    let x = match side {
        ArcSide::Left => CLOSE_BUTTON_INSET,
        ArcSide::Right => width - CLOSE_BUTTON_INSET - BUTTON_SIZE,
    };
    CloseButton { x, y: height / 4.0 }
}
