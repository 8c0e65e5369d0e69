// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a photo through a non-interactive capture session
//! - Printing the radial panel layout

use obscura::app::layout::{self, ArcSide, CloseButton, RadialButton};
use obscura::app::permissions::{PermissionSource, StaticPermissions};
use obscura::app::{CameraSession, Message, SessionScreen, SessionSettings};
use obscura::backends::camera::{
    CameraBackend, CameraFacing, DeviceSummary, VirtualCameraBackend,
};
use obscura::constants::ZOOM_OPTIONS;
use obscura::Config;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Parameters of a one-shot capture
pub struct PhotoRequest {
    pub facing: CameraFacing,
    pub zoom: Option<f64>,
    pub exposure: Option<f64>,
    pub flash: bool,
    pub torch: bool,
    pub output: Option<PathBuf>,
}

/// List all available cameras
pub fn list_cameras(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let backend = VirtualCameraBackend::new(config.capture_directory());
    let cameras = backend.enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {} ({})", index, camera.name, camera.facing);
        for line in DeviceSummary::from_device(camera).lines() {
            println!("      {}", line);
        }
        if camera.formats.len() > 1 {
            let others: Vec<String> = camera.formats[1..].iter().map(|f| f.to_string()).collect();
            println!("      Other formats: {}", others.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Take a photo through a capture session
pub fn take_photo(
    config: &Config,
    request: PhotoRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(VirtualCameraBackend::new(config.capture_directory()));
    let permissions = StaticPermissions(config.permissions).current();
    let mut session = CameraSession::new(backend, permissions, SessionSettings::from(config));

    if request.facing != session.parameters().facing() {
        session.update(Message::SwitchCamera);
    }

    match session.screen() {
        SessionScreen::Redirect(_) => {
            return Err("Camera permission is missing; grant it in the configuration".into());
        }
        SessionScreen::NoDevice(facing) => {
            return Err(format!("No {} camera available", facing).into());
        }
        SessionScreen::Capture(view) => {
            println!("Using camera: {}", view.device.name);
        }
    }

    if let Some(exposure) = request.exposure {
        // The CLI stands in for the exposure panel, which only offers these values
        let options = session.exposure_options();
        if !options.contains(&exposure) {
            return Err(format!(
                "Exposure {} is not available on {} (choose from {:?})",
                exposure,
                session.platform().display_name(),
                options
            )
            .into());
        }
        session.update(Message::SetExposure(exposure));
    }
    if let Some(zoom) = request.zoom {
        session.update(Message::SetZoom(zoom));
    }
    if request.flash {
        session.update(Message::ToggleFlash);
    }
    if request.torch {
        session.update(Message::ToggleTorch);
    }
    println!("{}", session.parameters().status_text());

    println!("Capturing...");
    let rt = tokio::runtime::Runtime::new()?;
    let media = rt.block_on(session.capture_photo())?;

    if let Some(target) = request.output {
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&media.path, &target)?;
        println!("Photo saved: {}", target.display());
        return Ok(());
    }

    println!("Photo saved: {}", media.path);
    Ok(())
}

#[derive(Serialize)]
struct LayoutReport {
    side: ArcSide,
    width: f64,
    height: f64,
    radius: f64,
    buttons: Vec<RadialButton>,
    close_button: CloseButton,
}

/// Print a panel's radial layout as JSON
pub fn print_layout(
    config: &Config,
    side: ArcSide,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let width = width.unwrap_or(config.window.width);
    let height = height.unwrap_or(config.window.height);
    let values: &[f64] = match side {
        ArcSide::Left => &ZOOM_OPTIONS,
        ArcSide::Right => config.platform.exposure_options(),
    };

    let report = LayoutReport {
        side,
        width,
        height,
        radius: layout::arc_radius(width, height),
        buttons: layout::radial_layout(values, width, height, side),
        close_button: layout::close_button(width, height, side),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
