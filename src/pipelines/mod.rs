// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! - `photo`: turning a live camera frame into an uploadable JPEG still
//! - `recipe`: sending images to the detection/generation endpoint

pub mod photo;
pub mod recipe;
