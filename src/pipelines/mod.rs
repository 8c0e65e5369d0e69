// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines
//!
//! - [`photo`]: single-slot still capture and the review-screen handoff

pub mod photo;
