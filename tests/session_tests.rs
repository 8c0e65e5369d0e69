// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end tests for the capture session controller

use futures::future::BoxFuture;
use obscura::app::{
    CameraSession, Command, Message, PanelVisibility, PermissionState, PermissionStatus, Route,
    SessionScreen, SessionSettings,
};
use obscura::backends::camera::{
    BackendError, BackendResult, CameraBackend, CameraDevice, CameraFacing, CameraFormat,
    CameraHandle, PhotoFile, PhotoOptions, PreviewSettings,
};
use obscura::constants::PlatformFamily;
use obscura::{CaptureError, MediaKind};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn device(id: &str, facing: CameraFacing, neutral_zoom: f64) -> CameraDevice {
    CameraDevice {
        id: id.into(),
        name: format!("Test {}", facing),
        facing,
        neutral_zoom,
        formats: vec![CameraFormat {
            max_fps: 60.0,
            photo_width: 4032,
            photo_height: 3024,
        }],
    }
}

/// Backend whose devices always capture to a fixed path
struct FakeBackend {
    devices: Vec<CameraDevice>,
    fail_open: bool,
    photo_path: PathBuf,
    bound: Arc<Mutex<Vec<PreviewSettings>>>,
}

impl FakeBackend {
    fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            fail_open: false,
            photo_path: PathBuf::from("/tmp/img1.jpg"),
            bound: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

struct FakeHandle {
    device: CameraDevice,
    photo_path: PathBuf,
    bound: Arc<Mutex<Vec<PreviewSettings>>>,
}

impl CameraBackend for FakeBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.devices.clone()
    }

    fn open(&self, device: &CameraDevice) -> BackendResult<Arc<dyn CameraHandle>> {
        if self.fail_open {
            return Err(BackendError::DeviceUnavailable(device.id.clone()));
        }
        Ok(Arc::new(FakeHandle {
            device: device.clone(),
            photo_path: self.photo_path.clone(),
            bound: Arc::clone(&self.bound),
        }))
    }
}

impl CameraHandle for FakeHandle {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn bind_preview(&self, settings: PreviewSettings) -> BackendResult<()> {
        self.bound.lock().unwrap().push(settings);
        Ok(())
    }

    fn take_photo(&self, _options: PhotoOptions) -> BoxFuture<'_, BackendResult<PhotoFile>> {
        let file = PhotoFile {
            path: self.photo_path.clone(),
            width: 4032,
            height: 3024,
        };
        Box::pin(async move { Ok(file) })
    }
}

fn both_devices() -> Vec<CameraDevice> {
    vec![
        device("back", CameraFacing::Back, 1.0),
        device("front", CameraFacing::Front, 1.0),
    ]
}

fn settings() -> SessionSettings {
    SessionSettings {
        platform: PlatformFamily::Apple,
        initial_facing: CameraFacing::Back,
        enable_shutter_sound: false,
    }
}

fn session_with(backend: FakeBackend) -> CameraSession {
    CameraSession::new(Arc::new(backend), PermissionState::granted(), settings())
}

#[test]
fn test_denied_microphone_does_not_redirect() {
    let permissions = PermissionState {
        camera: PermissionStatus::Granted,
        microphone: PermissionStatus::Denied,
    };
    let session = CameraSession::new(Arc::new(FakeBackend::new(both_devices())), permissions, settings());

    assert!(matches!(session.screen(), SessionScreen::Capture(_)));
    assert!(session.camera().is_some());
}

#[test]
fn test_denied_camera_redirects() {
    let permissions = PermissionState {
        camera: PermissionStatus::Denied,
        microphone: PermissionStatus::Granted,
    };
    let session = CameraSession::new(Arc::new(FakeBackend::new(both_devices())), permissions, settings());

    assert_eq!(session.screen(), SessionScreen::Redirect(Route::Permissions));
    assert!(session.camera().is_none(), "No camera is opened while redirecting");
}

#[test]
fn test_granting_permissions_opens_camera() {
    let mut session = CameraSession::new(
        Arc::new(FakeBackend::new(both_devices())),
        PermissionState::default(),
        settings(),
    );
    assert!(session.should_redirect());

    let command = session.update(Message::PermissionsChanged(PermissionState::granted()));

    assert!(command.is_none());
    assert!(session.camera().is_some());
    assert!(matches!(session.screen(), SessionScreen::Capture(_)));
}

#[test]
fn test_revoked_permission_navigates_to_permissions() {
    let mut session = session_with(FakeBackend::new(both_devices()));
    let revoked = PermissionState {
        camera: PermissionStatus::Denied,
        microphone: PermissionStatus::Granted,
    };

    let command = session.update(Message::PermissionsChanged(revoked));

    assert!(matches!(command, Command::Navigate(Route::Permissions)));
    assert!(session.camera().is_none());
}

#[test]
fn test_zoom_survives_camera_switches() {
    let mut session = session_with(FakeBackend::new(both_devices()));

    session.update(Message::SetZoom(4.0));
    session.update(Message::SwitchCamera);
    assert_eq!(session.parameters().facing(), CameraFacing::Front);
    session.update(Message::SwitchCamera);

    assert_eq!(session.parameters().facing(), CameraFacing::Back);
    assert_eq!(session.parameters().zoom(), 4.0);
}

#[test]
fn test_zoom_reset_uses_device_neutral_zoom() {
    let devices = vec![
        device("back", CameraFacing::Back, 2.0),
        device("front", CameraFacing::Front, 1.0),
    ];
    let mut session = session_with(FakeBackend::new(devices));
    assert_eq!(session.parameters().zoom(), 2.0);

    session.update(Message::SetZoom(300.0));
    assert_eq!(session.parameters().zoom(), 128.0);

    session.update(Message::SetZoom(-1.0));
    assert_eq!(session.parameters().zoom(), 2.0);
}

#[test]
fn test_parameter_changes_rebind_preview() {
    let backend = FakeBackend::new(both_devices());
    let bound = Arc::clone(&backend.bound);
    let mut session = session_with(backend);

    session.update(Message::SetExposure(-2.0));
    session.update(Message::ToggleTorch);

    let last = *bound.lock().unwrap().last().unwrap();
    assert_eq!(last.exposure, -2.0);
    assert!(last.torch.is_on());
}

#[test]
fn test_missing_front_camera_renders_empty_state() {
    let mut session = session_with(FakeBackend::new(vec![device("back", CameraFacing::Back, 1.0)]));

    session.update(Message::SwitchCamera);

    assert_eq!(session.screen(), SessionScreen::NoDevice(CameraFacing::Front));
    assert!(session.camera().is_none());
}

#[test]
fn test_capture_without_camera_handle() {
    let mut backend = FakeBackend::new(both_devices());
    backend.fail_open = true;
    let mut session = session_with(backend);
    session.update(Message::SetZoom(3.0));
    let before = session.parameters().clone();

    let command = session.update(Message::Capture);

    assert!(command.is_none());
    assert_eq!(session.last_capture_error(), Some(&CaptureError::CameraRefMissing));
    assert!(matches!(session.screen(), SessionScreen::Capture(_)));
    assert_eq!(session.parameters(), &before);
    assert!(!session.is_capturing());
}

#[tokio::test]
async fn test_capture_navigates_once_to_review() {
    let mut session = session_with(FakeBackend::new(both_devices()));

    let Command::Capture(job) = session.update(Message::Capture) else {
        panic!("expected a capture job");
    };
    assert!(session.is_capturing());

    let result = job.run().await;
    let command = session.update(Message::PhotoCaptured(result.clone()));
    let Command::Navigate(Route::Media(media)) = command else {
        panic!("expected navigation to the review screen");
    };
    assert_eq!(media.path, "/tmp/img1.jpg");
    assert_eq!(media.kind, MediaKind::Photo);

    // A duplicate completion must not navigate again
    assert!(session.update(Message::PhotoCaptured(result)).is_none());
}

#[tokio::test]
async fn test_revoked_permission_during_capture_skips_review() {
    let mut session = session_with(FakeBackend::new(both_devices()));
    let Command::Capture(job) = session.update(Message::Capture) else {
        panic!("expected a capture job");
    };
    let revoked = PermissionState {
        camera: PermissionStatus::Denied,
        microphone: PermissionStatus::Granted,
    };
    session.update(Message::PermissionsChanged(revoked));

    let command = session.update(Message::PhotoCaptured(job.run().await));

    assert!(matches!(command, Command::Navigate(Route::Permissions)));
    assert!(!session.is_capturing());
}

#[test]
fn test_capture_while_in_flight_is_rejected() {
    let mut session = session_with(FakeBackend::new(both_devices()));

    let first = session.update(Message::Capture);
    assert!(matches!(first, Command::Capture(_)));

    let second = session.update(Message::Capture);
    assert!(second.is_none());
    assert_eq!(session.last_capture_error(), Some(&CaptureError::CaptureInProgress));
    assert!(session.is_capturing());
}

#[test]
fn test_capture_failure_keeps_session() {
    let mut session = session_with(FakeBackend::new(both_devices()));
    let _job = session.update(Message::Capture);

    let failure = Err(CaptureError::CaptureHardwareFailure("sensor error".into()));
    let command = session.update(Message::PhotoCaptured(failure));

    assert!(command.is_none());
    assert!(!session.is_capturing());
    assert!(matches!(
        session.last_capture_error(),
        Some(CaptureError::CaptureHardwareFailure(_))
    ));
}

#[tokio::test]
async fn test_capture_photo_helper() {
    let mut session = session_with(FakeBackend::new(both_devices()));

    let media = session.capture_photo().await.unwrap();

    assert_eq!(media.path, "/tmp/img1.jpg");
    assert!(!session.is_capturing());
}

#[test]
fn test_panels_are_mutually_exclusive() {
    let mut session = session_with(FakeBackend::new(both_devices()));

    session.update(Message::ShowZoomControls);
    assert_eq!(session.panel(), PanelVisibility::ZoomPanel);

    // Exposure cannot open on top of the zoom panel
    session.update(Message::ShowExposureControls);
    assert_eq!(session.panel(), PanelVisibility::ZoomPanel);

    session.update(Message::CloseZoomControls);
    session.update(Message::ShowExposureControls);
    assert_eq!(session.panel(), PanelVisibility::ExposurePanel);
}

#[test]
fn test_open_gallery_command() {
    let mut session = session_with(FakeBackend::new(both_devices()));
    assert!(matches!(session.update(Message::OpenGallery), Command::OpenGallery));
}

#[test]
fn test_status_text_reflects_parameters() {
    let mut session = session_with(FakeBackend::new(both_devices()));
    session.update(Message::SetZoom(2.0));
    session.update(Message::SetExposure(1.0));

    let SessionScreen::Capture(view) = session.screen() else {
        panic!("expected capture screen");
    };
    assert_eq!(view.status_text, "Exposure: 1 | Zoom: x2");
    assert_eq!(view.device.name, "Test back");
}
