// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate
//!
//! Decides whether a capture session may start. The permission subsystem
//! itself (request dialogs, OS storage) lives outside the session; the gate
//! only reads the status it reports.

use serde::{Deserialize, Serialize};

/// Status of a single permission as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    #[default]
    NotDetermined,
}

impl PermissionStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::NotDetermined => "not-determined",
        }
    }
}

/// Camera and microphone permission snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionState {
    pub camera: PermissionStatus,
    pub microphone: PermissionStatus,
}

impl PermissionState {
    /// Both permissions granted
    pub fn granted() -> Self {
        Self {
            camera: PermissionStatus::Granted,
            microphone: PermissionStatus::Granted,
        }
    }
}

/// Source of the current permission snapshot
pub trait PermissionSource {
    fn current(&self) -> PermissionState;
}

/// Permission source reporting a fixed snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPermissions(pub PermissionState);

impl PermissionSource for StaticPermissions {
    fn current(&self) -> PermissionState {
        self.0
    }
}

/// Whether the session must redirect to the permission screen
///
/// Camera access must be granted. The microphone only blocks entry while it
/// is still undetermined, which forces the user through a decision; an
/// explicit denial is accepted.
pub fn should_redirect(state: &PermissionState) -> bool {
    state.camera != PermissionStatus::Granted
        || state.microphone == PermissionStatus::NotDetermined
}

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionStatus::*;

    const ALL: [PermissionStatus; 3] = [Granted, Denied, NotDetermined];

    fn state(camera: PermissionStatus, microphone: PermissionStatus) -> PermissionState {
        PermissionState { camera, microphone }
    }

    #[test]
    fn test_camera_not_granted_always_redirects() {
        for camera in [Denied, NotDetermined] {
            for microphone in ALL {
                assert!(should_redirect(&state(camera, microphone)));
            }
        }
    }

    #[test]
    fn test_granted_camera_redirects_only_for_undetermined_microphone() {
        assert!(should_redirect(&state(Granted, NotDetermined)));
        assert!(!should_redirect(&state(Granted, Granted)));
        assert!(!should_redirect(&state(Granted, Denied)));
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&state(Granted, NotDetermined)).unwrap();
        assert_eq!(json, r#"{"camera":"granted","microphone":"not-determined"}"#);
    }
}
