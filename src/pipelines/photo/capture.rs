// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture from an opened camera
//!
//! Capture is a single-slot operation: [`CapturePipeline::begin`] claims the
//! slot and hands out a [`PhotoJob`], and [`CapturePipeline::finish`] releases
//! it with the job's result. Jobs cannot be cancelled once issued.

use super::{CapturedMedia, MediaKind};
use crate::app::parameters::CaptureParameters;
use crate::backends::camera::{BackendError, CameraHandle, PhotoFile, PhotoOptions};
use crate::errors::CaptureError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Upper bound for a single hardware capture
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Capture slot state machine
#[derive(Debug, Default)]
pub enum CaptureState {
    /// Ready to capture
    #[default]
    Idle,
    /// A job was issued and has not reported back yet
    InFlight {
        /// When the job was issued
        started: Instant,
    },
}

impl CaptureState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, CaptureState::InFlight { .. })
    }
}

/// A capture issued to the hardware
///
/// Owns everything it needs so it can run on any executor. Dropping the
/// future does not abort the hardware capture; there is no cancel.
pub struct PhotoJob {
    camera: Arc<dyn CameraHandle>,
    options: PhotoOptions,
}

impl std::fmt::Debug for PhotoJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoJob")
            .field("device", &self.camera.device().name)
            .field("options", &self.options)
            .finish()
    }
}

impl PhotoJob {
    pub fn options(&self) -> PhotoOptions {
        self.options
    }

    /// Run the capture to completion
    pub async fn run(self) -> Result<PhotoFile, CaptureError> {
        info!(flash = ?self.options.flash, "Taking photo...");
        match tokio::time::timeout(CAPTURE_TIMEOUT, self.camera.take_photo(self.options)).await {
            Ok(result) => result.map_err(CaptureError::from),
            Err(_) => {
                warn!(timeout_s = CAPTURE_TIMEOUT.as_secs(), "No photo before the timeout");
                Err(BackendError::Timeout.into())
            }
        }
    }
}

/// Photo capture handler
pub struct CapturePipeline {
    state: CaptureState,
    enable_shutter_sound: bool,
}

impl CapturePipeline {
    pub fn new(enable_shutter_sound: bool) -> Self {
        Self {
            state: CaptureState::Idle,
            enable_shutter_sound,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Claim the capture slot and build the job for the current parameters
    ///
    /// Fails without side effects when a capture is already running or no
    /// camera is bound.
    pub fn begin(
        &mut self,
        camera: Option<&Arc<dyn CameraHandle>>,
        params: &CaptureParameters,
    ) -> Result<PhotoJob, CaptureError> {
        if self.state.is_in_flight() {
            warn!("Capture requested while another is in flight");
            return Err(CaptureError::CaptureInProgress);
        }
        let Some(camera) = camera else {
            error!(error = %CaptureError::CameraRefMissing, "Failed to take photo!");
            return Err(CaptureError::CameraRefMissing);
        };

        self.state = CaptureState::InFlight {
            started: Instant::now(),
        };
        Ok(PhotoJob {
            camera: Arc::clone(camera),
            options: params.photo_options(self.enable_shutter_sound),
        })
    }

    /// Release the slot with the result of the issued job
    ///
    /// Returns `None` for a result that arrives while no capture is in
    /// flight, so each capture produces at most one handoff.
    pub fn finish(
        &mut self,
        result: Result<PhotoFile, CaptureError>,
    ) -> Option<Result<CapturedMedia, CaptureError>> {
        let CaptureState::InFlight { started } = std::mem::take(&mut self.state) else {
            warn!("Ignoring capture result with no capture in flight");
            return None;
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        Some(match result {
            Ok(photo) => {
                info!(path = %photo.path.display(), elapsed_ms, "Photo captured");
                Ok(CapturedMedia {
                    path: photo.path.to_string_lossy().into_owned(),
                    kind: MediaKind::Photo,
                })
            }
            Err(e) => {
                error!(error = %e, elapsed_ms, "Failed to take photo!");
                Err(e)
            }
        })
    }

    /// Begin, run and finish a capture in one call
    pub async fn capture(
        &mut self,
        camera: Option<&Arc<dyn CameraHandle>>,
        params: &CaptureParameters,
    ) -> Result<CapturedMedia, CaptureError> {
        let job = self.begin(camera, params)?;
        let result = job.run().await;
        debug!(ok = result.is_ok(), "Capture job returned");
        self.finish(result)
            .unwrap_or(Err(CaptureError::CaptureInProgress))
    }
}

impl Default for CapturePipeline {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{
        BackendResult, CameraDevice, CameraFacing, FlashMode, PreviewSettings,
    };
    use futures::FutureExt;
    use futures::future::{self, BoxFuture};
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct ScriptedCamera {
        device: CameraDevice,
        /// `None` leaves the capture pending forever
        result: Option<BackendResult<PhotoFile>>,
        last_options: Mutex<Option<PhotoOptions>>,
    }

    impl ScriptedCamera {
        fn new(result: BackendResult<PhotoFile>) -> Arc<Self> {
            Self::scripted(Some(result))
        }

        fn stalled() -> Arc<Self> {
            Self::scripted(None)
        }

        fn scripted(result: Option<BackendResult<PhotoFile>>) -> Arc<Self> {
            Arc::new(Self {
                device: CameraDevice {
                    id: "scripted".into(),
                    name: "Scripted".into(),
                    facing: CameraFacing::Back,
                    neutral_zoom: 1.0,
                    formats: vec![],
                },
                result,
                last_options: Mutex::new(None),
            })
        }
    }

    impl CameraHandle for ScriptedCamera {
        fn device(&self) -> &CameraDevice {
            &self.device
        }

        fn bind_preview(&self, _settings: PreviewSettings) -> BackendResult<()> {
            Ok(())
        }

        fn take_photo(&self, options: PhotoOptions) -> BoxFuture<'_, BackendResult<PhotoFile>> {
            *self.last_options.lock().unwrap() = Some(options);
            match self.result.clone() {
                Some(result) => future::ready(result).boxed(),
                None => future::pending().boxed(),
            }
        }
    }

    fn photo(path: &str) -> PhotoFile {
        PhotoFile {
            path: PathBuf::from(path),
            width: 4,
            height: 3,
        }
    }

    fn params() -> CaptureParameters {
        CaptureParameters::new(1.0, CameraFacing::Back)
    }

    #[tokio::test]
    async fn test_capture_success_produces_photo_media() {
        let camera: Arc<dyn CameraHandle> = ScriptedCamera::new(Ok(photo("/tmp/img1.jpg")));
        let mut pipeline = CapturePipeline::default();

        let media = pipeline.capture(Some(&camera), &params()).await.unwrap();
        assert_eq!(
            media,
            CapturedMedia {
                path: "/tmp/img1.jpg".into(),
                kind: MediaKind::Photo
            }
        );
        assert!(!pipeline.is_capturing());
    }

    #[tokio::test]
    async fn test_missing_camera_is_reported() {
        let mut pipeline = CapturePipeline::default();
        let result = pipeline.capture(None, &params()).await;
        assert_eq!(result, Err(CaptureError::CameraRefMissing));
        assert!(!pipeline.is_capturing());
    }

    #[tokio::test]
    async fn test_hardware_failure_releases_slot() {
        let camera: Arc<dyn CameraHandle> =
            ScriptedCamera::new(Err(BackendError::CaptureRejected("busy".into())));
        let mut pipeline = CapturePipeline::default();

        let result = pipeline.capture(Some(&camera), &params()).await;
        assert!(matches!(result, Err(CaptureError::CaptureHardwareFailure(_))));
        assert!(!pipeline.is_capturing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_capture_times_out() {
        let camera: Arc<dyn CameraHandle> = ScriptedCamera::stalled();
        let mut pipeline = CapturePipeline::default();

        let result = pipeline.capture(Some(&camera), &params()).await;
        assert_eq!(
            result,
            Err(CaptureError::CaptureHardwareFailure(
                BackendError::Timeout.to_string()
            ))
        );
        assert!(!pipeline.is_capturing());
    }

    #[test]
    fn test_second_begin_while_in_flight_is_rejected() {
        let camera: Arc<dyn CameraHandle> = ScriptedCamera::new(Ok(photo("/tmp/a.jpg")));
        let mut pipeline = CapturePipeline::default();

        let _job = pipeline.begin(Some(&camera), &params()).unwrap();
        assert!(pipeline.is_capturing());
        assert_eq!(
            pipeline.begin(Some(&camera), &params()).unwrap_err(),
            CaptureError::CaptureInProgress
        );
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut pipeline = CapturePipeline::default();
        assert!(pipeline.finish(Ok(photo("/tmp/a.jpg"))).is_none());
    }

    #[tokio::test]
    async fn test_job_passes_flash_and_shutter_sound() {
        let scripted = ScriptedCamera::new(Ok(photo("/tmp/a.jpg")));
        let camera: Arc<dyn CameraHandle> = scripted.clone();
        let mut pipeline = CapturePipeline::new(true);
        let mut params = params();
        params.set_flash(FlashMode::On);

        let job = pipeline.begin(Some(&camera), &params).unwrap();
        job.run().await.unwrap();

        let options = scripted.last_options.lock().unwrap().unwrap();
        assert_eq!(options.flash, FlashMode::On);
        assert!(options.enable_shutter_sound);
    }
}
