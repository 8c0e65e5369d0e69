// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera hardware
//!
//! The session only sees the [`camera::CameraBackend`] and
//! [`camera::CameraHandle`] traits. The bundled implementation is the
//! software [`camera::VirtualCameraBackend`].

pub mod camera;
