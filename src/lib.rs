// SPDX-License-Identifier: GPL-3.0-only

//! Obscura - camera capture session controller
//!
//! This library provides the capture session behind the Obscura camera:
//! permission gating, capture parameters, the zoom/exposure panels with
//! their radial button layout, and the single-slot photo capture pipeline.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Session controller, parameter store, panels, layout, permission gate
//! - [`backends`]: Camera backend abstraction and the virtual camera
//! - [`pipelines`]: Photo capture pipeline and review-screen handoff
//! - [`config`]: User configuration handling
//! - [`storage`]: Gallery storage used by the review screen
//! - [`terminal`]: Interactive terminal front-end
//!
//! # Example
//!
//! ```no_run
//! use obscura::app::{CameraSession, Message, PermissionState, SessionSettings};
//! use obscura::backends::camera::VirtualCameraBackend;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let backend = Arc::new(VirtualCameraBackend::new(std::env::temp_dir()));
//! let mut session = CameraSession::new(backend, PermissionState::granted(), SessionSettings::default());
//! session.update(Message::SetZoom(4.0));
//! let media = session.capture_photo().await;
//! # }
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{CameraSession, Command, Message, Route, SessionScreen, SessionSettings};
pub use config::Config;
pub use errors::{AppError, AppResult, CameraError, CaptureError};
pub use pipelines::photo::{CapturedMedia, MediaKind};
