// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for hardware capture
//!
//! Only camera capture lives here; the recipe endpoint is reached through
//! [`crate::pipelines::recipe`].

pub mod camera;
