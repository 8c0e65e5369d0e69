// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Dispatches the capture job and turns its result into a navigation to the
//! review screen. Failures keep the session on the capture screen.

use crate::app::CameraSession;
use crate::app::state::{Command, Route};
use crate::backends::camera::PhotoFile;
use crate::errors::CaptureError;
use crate::pipelines::photo::CapturedMedia;
use tracing::{debug, warn};

impl CameraSession {
    pub(crate) fn handle_capture(&mut self) -> Command {
        if self.should_redirect() {
            debug!("Capture ignored while permissions are missing");
            return Command::None;
        }
        match self.capture.begin(self.camera.as_ref(), &self.params) {
            Ok(job) => {
                self.last_capture_error = None;
                Command::Capture(job)
            }
            Err(e) => {
                self.last_capture_error = Some(e);
                Command::None
            }
        }
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        result: Result<PhotoFile, CaptureError>,
    ) -> Command {
        match self.capture.finish(result) {
            Some(Ok(media)) if self.should_redirect() => {
                warn!(path = %media.path, "Permissions revoked during capture, not opening review");
                Command::Navigate(Route::Permissions)
            }
            Some(Ok(media)) => Command::Navigate(Route::Media(media)),
            Some(Err(e)) => {
                self.last_capture_error = Some(e);
                Command::None
            }
            None => Command::None,
        }
    }

    /// Capture with the current parameters and wait for the handoff payload
    ///
    /// For callers without an event loop; the result is the same as sending
    /// [`Message::Capture`](crate::app::Message::Capture) and feeding the job
    /// result back.
    pub async fn capture_photo(&mut self) -> Result<CapturedMedia, CaptureError> {
        let job = match self.handle_capture() {
            Command::Capture(job) => job,
            _ => {
                return Err(self
                    .last_capture_error
                    .clone()
                    .unwrap_or(CaptureError::CameraRefMissing));
            }
        };
        let result = job.run().await;
        match self.handle_photo_captured(result) {
            Command::Navigate(Route::Media(media)) => Ok(media),
            _ => Err(self
                .last_capture_error
                .clone()
                .unwrap_or(CaptureError::CaptureInProgress)),
        }
    }
}
