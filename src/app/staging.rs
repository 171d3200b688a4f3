// SPDX-License-Identifier: GPL-3.0-only

//! Single-slot staging area
//!
//! At most one image waits for confirmation at a time. Staging replaces and
//! discards whatever was staged before. A freshly captured or uploaded image
//! owns its preview handle; an image staged from the gallery borrows the
//! item's handle, which stays with the item.

use super::state::GalleryId;
use crate::media::{PreviewHandle, ResourceRegistry, SourceImage};
use tracing::debug;

/// Where the staged image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedOrigin {
    New,
    Existing(GalleryId),
}

/// The image waiting for confirmation
#[derive(Debug)]
pub enum StagedSelection {
    /// Captured or uploaded; owns its preview
    New {
        source: SourceImage,
        preview: PreviewHandle,
    },
    /// Re-staged from the gallery; the item keeps its preview
    Existing { id: GalleryId, source: SourceImage },
}

impl StagedSelection {
    pub fn origin(&self) -> StagedOrigin {
        match self {
            StagedSelection::New { .. } => StagedOrigin::New,
            StagedSelection::Existing { id, .. } => StagedOrigin::Existing(*id),
        }
    }

    pub fn source(&self) -> &SourceImage {
        match self {
            StagedSelection::New { source, .. } | StagedSelection::Existing { source, .. } => source,
        }
    }

    /// Release whatever this selection owns
    fn discard(self, registry: &mut ResourceRegistry) {
        match self {
            StagedSelection::New { preview, .. } => registry.release(preview),
            StagedSelection::Existing { id, .. } => {
                debug!(%id, "Unstaging gallery item, preview stays with the item");
            }
        }
    }
}

/// Holds zero or one [`StagedSelection`]
#[derive(Debug, Default)]
pub struct StagingSlot {
    current: Option<StagedSelection>,
}

impl StagingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&StagedSelection> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Gallery item currently staged, if the staged image came from the gallery
    pub fn staged_gallery_id(&self) -> Option<GalleryId> {
        match self.current {
            Some(StagedSelection::Existing { id, .. }) => Some(id),
            _ => None,
        }
    }

    /// Stage a new image, acquiring a preview for it
    pub fn stage_new(&mut self, source: SourceImage, registry: &mut ResourceRegistry) {
        self.cancel(registry);
        let preview = registry.acquire(&source);
        debug!(name = source.name(), preview = preview.url(), "Staged new image");
        self.current = Some(StagedSelection::New { source, preview });
    }

    /// Stage an existing gallery item without taking its preview
    pub fn stage_existing(
        &mut self,
        id: GalleryId,
        source: SourceImage,
        registry: &mut ResourceRegistry,
    ) {
        self.cancel(registry);
        debug!(%id, "Staged gallery item");
        self.current = Some(StagedSelection::Existing { id, source });
    }

    /// Hand the staged selection to the caller, leaving the slot empty
    ///
    /// Ownership of a `New` preview moves with it.
    pub fn take(&mut self) -> Option<StagedSelection> {
        self.current.take()
    }

    /// Empty the slot, releasing an owned preview
    pub fn cancel(&mut self, registry: &mut ResourceRegistry) {
        if let Some(selection) = self.current.take() {
            selection.discard(registry);
        }
    }
}
