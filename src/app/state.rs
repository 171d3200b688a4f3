// SPDX-License-Identifier: GPL-3.0-only

//! Gallery item state types

use crate::media::{PreviewHandle, SourceImage};
use crate::pipelines::recipe::{DetectedIngredient, Generation, Recipe};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Stable identity of a gallery item
///
/// Assigned once when the item is created and never changed, so results that
/// arrive late can always find (or fail to find) their item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GalleryId(Uuid);

impl GalleryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GalleryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GalleryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing state of a gallery item
///
/// Results live inside the terminal variants, so an item can never carry a
/// recipe and an error at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// A detection/generation call is in flight
    Processing,
    /// The last call produced a recipe
    Done(Generation),
    /// The last call failed; carries the user-facing message
    Error(String),
}

impl ItemStatus {
    pub fn is_processing(&self) -> bool {
        matches!(self, ItemStatus::Processing)
    }

    /// Whether a call has completed for this item at least once
    pub fn has_outcome(&self) -> bool {
        matches!(self, ItemStatus::Done(_) | ItemStatus::Error(_))
    }

    /// Short lowercase name for logs and listings
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Processing => "processing",
            ItemStatus::Done(_) => "done",
            ItemStatus::Error(_) => "error",
        }
    }
}

/// One submitted photo and what became of it
pub struct GalleryItem {
    id: GalleryId,
    source: SourceImage,
    preview: PreviewHandle,
    status: ItemStatus,
    created_at: Instant,
}

impl GalleryItem {
    /// A freshly submitted item; processing starts immediately
    pub fn new(id: GalleryId, source: SourceImage, preview: PreviewHandle) -> Self {
        Self {
            id,
            source,
            preview,
            status: ItemStatus::Processing,
            created_at: Instant::now(),
        }
    }

    pub fn id(&self) -> GalleryId {
        self.id
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn status(&self) -> &ItemStatus {
        &self.status
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.status {
            ItemStatus::Done(generation) => Some(&generation.recipe),
            _ => None,
        }
    }

    /// Ingredients the detector reported with the recipe
    pub fn detected(&self) -> &[DetectedIngredient] {
        match &self.status {
            ItemStatus::Done(generation) => &generation.detected,
            _ => &[],
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.status {
            ItemStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }

    /// Give up the item, handing back its preview handle for release
    pub(crate) fn into_preview(self) -> PreviewHandle {
        self.preview
    }
}

impl fmt::Debug for GalleryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryItem")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("preview", &self.preview)
            .field("status", &self.status.label())
            .finish()
    }
}
