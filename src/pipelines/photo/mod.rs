// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline
//!
//! ```text
//! Session Controller → begin (claim slot) → PhotoJob::run → finish (release slot)
//!                                                 ↓
//!                                   CapturedMedia handoff → review screen
//! ```
//!
//! Every error is caught at this boundary, logged, and handed back to the
//! controller as a value. A failed capture never ends the session.

pub mod capture;

pub use capture::{CAPTURE_TIMEOUT, CapturePipeline, CaptureState, PhotoJob};

use serde::{Deserialize, Serialize};

/// Kind of media handed to the review screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
        }
    }
}

/// Handoff payload produced by a successful capture
///
/// Owned by the review screen once handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedMedia {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}
