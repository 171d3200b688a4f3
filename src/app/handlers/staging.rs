// SPDX-License-Identifier: GPL-3.0-only

//! Staging handlers

use crate::app::{GalleryId, Orchestrator, StagedSelection};
use crate::media::SourceImage;
use tracing::{debug, info};

impl Orchestrator {
    // =========================================================================
    // Staging Handlers
    // =========================================================================

    /// Stage an uploaded image for confirmation
    pub fn stage_new(&mut self, image: SourceImage) {
        self.staging.stage_new(image, &mut self.registry);
    }

    /// Stage a gallery item again (the "choose from gallery" flow)
    ///
    /// Also moves the selection pointer to it. Returns `false` if the item
    /// does not exist.
    pub fn stage_existing(&mut self, id: GalleryId) -> bool {
        let Some(source) = self.gallery.get(id).map(|item| item.source().clone()) else {
            debug!(%id, "Cannot stage missing gallery item");
            return false;
        };

        self.staging.stage_existing(id, source, &mut self.registry);
        self.select_existing(id)
    }

    /// Promote the staged image into the gallery and process it
    ///
    /// A new image becomes a new item unless it duplicates an existing one,
    /// in which case that item is reprocessed. A re-staged gallery item is
    /// reprocessed. Returns the id that ends up processing, or `None` when
    /// nothing was staged or the staged item has since been removed.
    pub fn confirm_staged(&mut self) -> Option<GalleryId> {
        let selection = self.staging.take()?;
        self.camera.stop();

        match selection {
            StagedSelection::New { source, preview } => Some(self.promote_new(source, preview)),
            StagedSelection::Existing { id, .. } => {
                if !self.reprocess(id) {
                    debug!(%id, "Staged gallery item is gone, nothing to confirm");
                    return None;
                }
                self.selected = Some(id);
                Some(id)
            }
        }
    }

    /// Drop the staged image and stop the camera
    pub fn cancel_staged(&mut self) {
        self.staging.cancel(&mut self.registry);
        self.camera.stop();
    }

    /// Stage and immediately confirm an uploaded image
    pub fn submit_new(&mut self, image: SourceImage) -> GalleryId {
        info!(name = image.name(), size = image.len(), "Submitting image");
        self.staging.cancel(&mut self.registry);
        self.camera.stop();

        let preview = self.registry.acquire(&image);
        self.promote_new(image, preview)
    }
}
