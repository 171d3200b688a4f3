// SPDX-License-Identifier: GPL-3.0-only

//! Gallery handlers

use crate::app::{GalleryId, GalleryPatch, Orchestrator, PatchOutcome};
use tracing::{debug, info};

impl Orchestrator {
    // =========================================================================
    // Gallery Handlers
    // =========================================================================

    /// Move the selection pointer to `id`
    ///
    /// An item that is not processing and has never produced a result is sent
    /// for processing. Returns `false` if the item does not exist.
    pub fn select_existing(&mut self, id: GalleryId) -> bool {
        let Some(item) = self.gallery.get(id) else {
            debug!(%id, "Cannot select missing gallery item");
            return false;
        };
        let needs_processing = !item.status().is_processing() && !item.status().has_outcome();

        self.selected = Some(id);
        if needs_processing {
            self.reprocess(id);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove an item and release its preview
    ///
    /// An in-flight call for the item keeps running; its result is discarded
    /// when it arrives. Returns `false` if the item does not exist.
    pub fn remove(&mut self, id: GalleryId) -> bool {
        if self.staging.staged_gallery_id() == Some(id) {
            debug!(%id, "Removed item was staged, clearing staging");
            self.staging.cancel(&mut self.registry);
            self.camera.stop();
        }

        let PatchOutcome::Removed(item) = self.gallery.apply(GalleryPatch::Remove(id)) else {
            return false;
        };
        self.registry.release(item.into_preview());

        if self.selected == Some(id) {
            self.selected = None;
        }
        info!(%id, remaining = self.gallery.len(), "Gallery item removed");
        true
    }
}
