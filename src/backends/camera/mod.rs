// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The session never talks to hardware directly. It goes through two traits:
//!
//! ```text
//! ┌─────────────────────┐
//! │  Session Controller │
//! └──────────┬──────────┘
//!            │ enumerate / open
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← Device enumeration by facing
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraHandle Trait  │  ← Preview binding, take_photo
//! └─────────────────────┘
//! ```

pub mod types;
pub mod virtual_device;

pub use types::*;
pub use virtual_device::VirtualCameraBackend;

use crate::errors::CameraError;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Device enumeration and opening
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Open a device and return an exclusive handle to it
    ///
    /// The handle stays valid until dropped; the session drops it when the
    /// facing changes or the session ends.
    fn open(&self, device: &CameraDevice) -> BackendResult<Arc<dyn CameraHandle>>;
}

/// An opened camera
pub trait CameraHandle: Send + Sync {
    /// Descriptor of the opened device
    fn device(&self) -> &CameraDevice;

    /// Re-bind the live preview with new zoom/exposure/torch values
    fn bind_preview(&self, settings: PreviewSettings) -> BackendResult<()>;

    /// Capture a still photo
    ///
    /// Resolves once the hardware has written the file. There is no way to
    /// cancel a capture after it was issued.
    fn take_photo(&self, options: PhotoOptions) -> BoxFuture<'_, BackendResult<PhotoFile>>;

    /// Latest preview frame scaled to fit `width`x`height`, if the backend can render one
    fn preview_frame(&self, _width: u32, _height: u32) -> Option<image::RgbImage> {
        None
    }
}

/// Pick the first device facing the requested side
pub fn select_device(
    devices: &[CameraDevice],
    facing: CameraFacing,
) -> Result<&CameraDevice, CameraError> {
    devices
        .iter()
        .find(|device| device.facing == facing)
        .ok_or(CameraError::NoDeviceAvailable(facing))
}

/// Display-only summary of a device's first format
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    pub name: String,
    /// `None` when the device advertises no formats
    pub format: Option<CameraFormat>,
}

impl DeviceSummary {
    pub fn from_device(device: &CameraDevice) -> Self {
        Self {
            name: device.name.clone(),
            format: device.formats.first().cloned(),
        }
    }

    /// Info lines shown above the primary button row
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(3);
        if let Some(format) = &self.format {
            lines.push(format!("Max FPS: {}", format.max_fps));
            lines.push(format!(
                "Width: {} Height: {}",
                format.photo_width, format.photo_height
            ));
        }
        lines.push(format!("Camera: {}", self.name));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, facing: CameraFacing, formats: Vec<CameraFormat>) -> CameraDevice {
        CameraDevice {
            id: id.to_string(),
            name: format!("Camera {}", id),
            facing,
            neutral_zoom: 1.0,
            formats,
        }
    }

    #[test]
    fn test_select_device_by_facing() {
        let devices = vec![
            device("0", CameraFacing::Back, vec![]),
            device("1", CameraFacing::Front, vec![]),
            device("2", CameraFacing::Back, vec![]),
        ];
        assert_eq!(select_device(&devices, CameraFacing::Back).unwrap().id, "0");
        assert_eq!(select_device(&devices, CameraFacing::Front).unwrap().id, "1");
    }

    #[test]
    fn test_select_device_missing_facing() {
        let devices = vec![device("0", CameraFacing::Back, vec![])];
        assert_eq!(
            select_device(&devices, CameraFacing::Front),
            Err(CameraError::NoDeviceAvailable(CameraFacing::Front))
        );
    }

    #[test]
    fn test_summary_uses_first_format() {
        let formats = vec![
            CameraFormat {
                max_fps: 60.0,
                photo_width: 4032,
                photo_height: 3024,
            },
            CameraFormat {
                max_fps: 30.0,
                photo_width: 1920,
                photo_height: 1080,
            },
        ];
        let summary = DeviceSummary::from_device(&device("0", CameraFacing::Back, formats));
        assert_eq!(
            summary.lines(),
            vec![
                "Max FPS: 60".to_string(),
                "Width: 4032 Height: 3024".to_string(),
                "Camera: Camera 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_without_formats_omits_display() {
        let summary = DeviceSummary::from_device(&device("0", CameraFacing::Back, vec![]));
        assert!(summary.format.is_none());
        assert_eq!(summary.lines(), vec!["Camera: Camera 0".to_string()]);
    }
}
