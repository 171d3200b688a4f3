// SPDX-License-Identifier: GPL-3.0-only

//! Image payloads and their local preview handles
//!
//! - [`source`]: immutable image payloads ([`SourceImage`]) as submitted by the user
//! - [`preview`]: revocable preview handles and the [`ResourceRegistry`] that issues them

pub mod preview;
pub mod source;

pub use preview::{PreviewHandle, ResourceRegistry};
pub use source::SourceImage;
