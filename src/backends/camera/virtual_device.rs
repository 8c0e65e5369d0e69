// SPDX-License-Identifier: GPL-3.0-only

//! Software camera backend
//!
//! Exposes a back and a front camera that render a synthetic test pattern.
//! The pattern reacts to the bound preview settings (zoom crops towards the
//! centre, exposure and torch change brightness) so the whole session can be
//! driven without camera hardware. Captures are encoded as JPEG files.

use super::types::{
    BackendError, BackendResult, CameraDevice, CameraFacing, CameraFormat, PhotoFile,
    PhotoOptions, PreviewSettings, TorchMode,
};
use super::{CameraBackend, CameraHandle};
use futures::future::BoxFuture;
use image::{Rgb, RgbImage};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Colour bars drawn across the upper part of the pattern
const BARS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

/// Extra luma added while the torch is on
const TORCH_BOOST: f32 = 40.0;
/// Extra luma added to a photo taken with flash
const FLASH_BOOST: f32 = 60.0;

/// Backend serving the two synthetic cameras
pub struct VirtualCameraBackend {
    devices: Vec<CameraDevice>,
    capture_dir: PathBuf,
}

impl VirtualCameraBackend {
    /// Create the backend with the default back and front devices
    pub fn new(capture_dir: PathBuf) -> Self {
        Self::with_devices(Self::default_devices(), capture_dir)
    }

    pub fn with_devices(devices: Vec<CameraDevice>, capture_dir: PathBuf) -> Self {
        Self {
            devices,
            capture_dir,
        }
    }

    pub fn default_devices() -> Vec<CameraDevice> {
        vec![
            CameraDevice {
                id: "virtual:0".into(),
                name: "Virtual Back Camera".into(),
                facing: CameraFacing::Back,
                neutral_zoom: 1.0,
                formats: vec![
                    CameraFormat {
                        max_fps: 60.0,
                        photo_width: 1920,
                        photo_height: 1440,
                    },
                    CameraFormat {
                        max_fps: 30.0,
                        photo_width: 1280,
                        photo_height: 960,
                    },
                ],
            },
            CameraDevice {
                id: "virtual:1".into(),
                name: "Virtual Front Camera".into(),
                facing: CameraFacing::Front,
                neutral_zoom: 1.0,
                formats: vec![CameraFormat {
                    max_fps: 30.0,
                    photo_width: 1280,
                    photo_height: 960,
                }],
            },
        ]
    }
}

impl CameraBackend for VirtualCameraBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.devices.clone()
    }

    fn open(&self, device: &CameraDevice) -> BackendResult<Arc<dyn CameraHandle>> {
        if !self.devices.iter().any(|d| d.id == device.id) {
            return Err(BackendError::DeviceNotFound(device.id.clone()));
        }
        info!(device = %device.name, "Opening virtual camera");
        Ok(Arc::new(VirtualCamera {
            device: device.clone(),
            preview: Mutex::new(PreviewSettings {
                zoom: device.neutral_zoom,
                exposure: 0.0,
                torch: TorchMode::Off,
            }),
            capture_dir: self.capture_dir.clone(),
        }))
    }
}

/// An opened synthetic camera
struct VirtualCamera {
    device: CameraDevice,
    preview: Mutex<PreviewSettings>,
    capture_dir: PathBuf,
}

impl VirtualCamera {
    fn current_settings(&self) -> BackendResult<PreviewSettings> {
        self.preview
            .lock()
            .map(|settings| *settings)
            .map_err(|_| BackendError::DeviceUnavailable(self.device.id.clone()))
    }
}

impl CameraHandle for VirtualCamera {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn bind_preview(&self, settings: PreviewSettings) -> BackendResult<()> {
        let mut preview = self
            .preview
            .lock()
            .map_err(|_| BackendError::DeviceUnavailable(self.device.id.clone()))?;
        *preview = settings;
        debug!(
            zoom = settings.zoom,
            exposure = settings.exposure,
            torch = ?settings.torch,
            "Preview bound"
        );
        Ok(())
    }

    fn take_photo(&self, options: PhotoOptions) -> BoxFuture<'_, BackendResult<PhotoFile>> {
        Box::pin(async move {
            let settings = self.current_settings()?;
            let (width, height) = self
                .device
                .formats
                .first()
                .map(|f| (f.photo_width, f.photo_height))
                .unwrap_or((640, 480));
            let facing = self.device.facing;
            let dir = self.capture_dir.clone();

            if options.enable_shutter_sound {
                debug!("Virtual camera has no shutter sound");
            }

            tokio::task::spawn_blocking(move || -> BackendResult<PhotoFile> {
                std::fs::create_dir_all(&dir)?;
                let frame = render_pattern(width, height, &settings, facing, options.flash.is_on());

                let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
                let path = dir.join(format!("IMG_{}.jpg", timestamp));
                frame.save_with_format(&path, image::ImageFormat::Jpeg)?;

                info!(path = %path.display(), width, height, "Virtual photo written");
                Ok(PhotoFile {
                    path,
                    width,
                    height,
                })
            })
            .await
            .map_err(|e| BackendError::Other(format!("capture task failed: {}", e)))?
        })
    }

    fn preview_frame(&self, width: u32, height: u32) -> Option<RgbImage> {
        let settings = self.current_settings().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(render_pattern(
            width,
            height,
            &settings,
            self.device.facing,
            false,
        ))
    }
}

/// Render the test pattern as seen through the given settings
pub fn render_pattern(
    width: u32,
    height: u32,
    settings: &PreviewSettings,
    facing: CameraFacing,
    flash: bool,
) -> RgbImage {
    let zoom = if settings.zoom.is_finite() && settings.zoom > 0.0 {
        settings.zoom
    } else {
        1.0
    };
    let gain = (1.0 + settings.exposure / 12.0).clamp(0.1, 2.0) as f32;
    let mut boost = 0.0;
    if settings.torch == TorchMode::On {
        boost += TORCH_BOOST;
    }
    if flash {
        boost += FLASH_BOOST;
    }

    RgbImage::from_fn(width, height, |x, y| {
        // Normalised coordinates, zoomed around the centre
        let mut u = x as f64 / width.max(1) as f64;
        let v = y as f64 / height.max(1) as f64;
        if facing == CameraFacing::Front {
            u = 1.0 - u;
        }
        let u = 0.5 + (u - 0.5) / zoom;
        let v = 0.5 + (v - 0.5) / zoom;

        let base = pattern_at(u, v);
        Rgb(base.map(|c| (c as f32 * gain + boost).clamp(0.0, 255.0) as u8))
    })
}

fn pattern_at(u: f64, v: f64) -> [u8; 3] {
    // Target rings around the centre make zoom changes obvious
    let du = u - 0.5;
    let dv = v - 0.5;
    let dist = (du * du + dv * dv).sqrt();
    if dist < 0.2 && ((dist * 40.0) as u32) % 2 == 0 {
        return [240, 240, 240];
    }

    if v < 0.66 {
        let index = ((u.clamp(0.0, 0.9999)) * BARS.len() as f64) as usize;
        BARS[index]
    } else {
        let level = (u.clamp(0.0, 1.0) * 255.0) as u8;
        [level, level, level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::FlashMode;

    fn settings(zoom: f64, exposure: f64, torch: TorchMode) -> PreviewSettings {
        PreviewSettings {
            zoom,
            exposure,
            torch,
        }
    }

    fn mean_luma(image: &RgbImage) -> f64 {
        let total: u64 = image.pixels().map(|p| p.0.iter().map(|&c| c as u64).sum::<u64>()).sum();
        total as f64 / (image.width() * image.height() * 3) as f64
    }

    #[test]
    fn test_torch_brightens_pattern() {
        let dark = render_pattern(64, 48, &settings(1.0, 0.0, TorchMode::Off), CameraFacing::Back, false);
        let lit = render_pattern(64, 48, &settings(1.0, 0.0, TorchMode::On), CameraFacing::Back, false);
        assert!(mean_luma(&lit) > mean_luma(&dark));
    }

    #[test]
    fn test_exposure_changes_brightness() {
        let low = render_pattern(64, 48, &settings(1.0, -2.0, TorchMode::Off), CameraFacing::Back, false);
        let high = render_pattern(64, 48, &settings(1.0, 2.0, TorchMode::Off), CameraFacing::Back, false);
        assert!(mean_luma(&high) > mean_luma(&low));
    }

    #[test]
    fn test_open_unknown_device_fails() {
        let backend = VirtualCameraBackend::new(std::env::temp_dir());
        let mut device = VirtualCameraBackend::default_devices().remove(0);
        device.id = "missing".into();
        assert!(matches!(
            backend.open(&device),
            Err(BackendError::DeviceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_take_photo_writes_jpeg() {
        let dir = std::env::temp_dir().join(format!("obscura-virtual-{}", std::process::id()));
        let backend = VirtualCameraBackend::new(dir.clone());
        let device = backend.enumerate_cameras().remove(1);
        let handle = backend.open(&device).unwrap();

        let photo = handle
            .take_photo(PhotoOptions {
                flash: FlashMode::On,
                enable_shutter_sound: false,
            })
            .await
            .unwrap();

        assert!(photo.path.starts_with(&dir));
        assert_eq!((photo.width, photo.height), (1280, 960));
        let decoded = image::open(&photo.path).unwrap();
        assert_eq!(decoded.width(), 1280);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
