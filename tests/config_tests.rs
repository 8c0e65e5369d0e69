// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use obscura::Config;
use obscura::app::{PermissionState, PermissionStatus};
use obscura::constants::PlatformFamily;
use std::path::PathBuf;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.platform, PlatformFamily::current());
    assert!(!config.shutter_sound, "Shutter sound should be off by default");
    assert_eq!(
        config.permissions,
        PermissionState::granted(),
        "Default config should not block the session"
    );
}

#[test]
fn test_config_partial_json_keeps_defaults() {
    let config = Config::from_json(r#"{ "platform": "android" }"#).unwrap();

    assert_eq!(config.platform, PlatformFamily::Android);
    assert_eq!(config.window, Config::default().window);
}

#[test]
fn test_config_permissions_from_json() {
    let config = Config::from_json(
        r#"{ "permissions": { "camera": "granted", "microphone": "denied" } }"#,
    )
    .unwrap();

    assert_eq!(config.permissions.camera, PermissionStatus::Granted);
    assert_eq!(config.permissions.microphone, PermissionStatus::Denied);
}

#[test]
fn test_config_invalid_json_is_error() {
    assert!(Config::from_json("{ not json").is_err());
}

#[test]
fn test_config_missing_file_yields_defaults() {
    let path = PathBuf::from("/nonexistent/obscura/config.json");
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_directory_overrides() {
    let config = Config::from_json(
        r#"{ "photo_directory": "/tmp/gallery", "capture_directory": "/tmp/captures" }"#,
    )
    .unwrap();

    assert_eq!(config.photo_directory(), PathBuf::from("/tmp/gallery"));
    assert_eq!(config.capture_directory(), PathBuf::from("/tmp/captures"));
}
