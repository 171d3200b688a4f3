// SPDX-License-Identifier: GPL-3.0-only

//! Processing handlers
//!
//! Dispatching is fire-and-forget; the result comes back on the completion
//! channel and is applied here by id. A result for an item that was removed
//! in the meantime is dropped.

use crate::app::{GalleryId, GalleryItem, GalleryPatch, Orchestrator};
use crate::media::{PreviewHandle, SourceImage};
use crate::pipelines::recipe::ProcessingOutcome;
use tracing::{debug, info};

/// A completion as it was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub id: GalleryId,
    /// `false` when the item no longer existed and the result was discarded
    pub applied: bool,
}

impl Orchestrator {
    // =========================================================================
    // Processing Handlers
    // =========================================================================

    /// Insert a new image, or reprocess the item it duplicates
    pub(crate) fn promote_new(&mut self, source: SourceImage, preview: PreviewHandle) -> GalleryId {
        if let Some(existing) = self.gallery.find_duplicate(&source) {
            info!(%existing, name = source.name(), "Duplicate submission, reprocessing existing item");
            // No item adopts the new preview
            self.registry.release(preview);
            self.selected = Some(existing);
            self.reprocess(existing);
            return existing;
        }

        let id = GalleryId::new();
        let item = GalleryItem::new(id, source.clone(), preview);
        self.gallery.apply(GalleryPatch::Insert(item));
        self.selected = Some(id);
        self.dispatch(id, source);
        id
    }

    /// Put an item back into `Processing` and send its stored image again
    ///
    /// Returns `false` if the item does not exist.
    pub fn reprocess(&mut self, id: GalleryId) -> bool {
        let Some(source) = self.gallery.get(id).map(|item| item.source().clone()) else {
            return false;
        };
        if self.gallery.apply(GalleryPatch::BeginProcessing(id)).is_stale() {
            return false;
        }
        self.dispatch(id, source);
        true
    }

    fn dispatch(&mut self, id: GalleryId, source: SourceImage) {
        self.in_flight += 1;
        // Dropping the JoinHandle detaches the task
        drop(self.pipeline.dispatch(id, source));
        debug!(%id, in_flight = self.in_flight, "Processing dispatched");
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Resolution> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.completions.recv().await?;
        Some(self.apply_outcome(outcome))
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn drain_completions(&mut self) -> Vec<Resolution> {
        let mut applied = Vec::new();
        while let Ok(outcome) = self.completions.try_recv() {
            applied.push(self.apply_outcome(outcome));
        }
        applied
    }

    /// Wait until nothing is in flight
    pub async fn settle(&mut self) -> Vec<Resolution> {
        let mut applied = Vec::new();
        while let Some(resolution) = self.next_completion().await {
            applied.push(resolution);
        }
        applied
    }

    fn apply_outcome(&mut self, outcome: ProcessingOutcome) -> Resolution {
        let ProcessingOutcome { id, result } = outcome;
        self.in_flight = self.in_flight.saturating_sub(1);

        let result = result.map_err(|e| e.user_message());
        let applied = !self
            .gallery
            .apply(GalleryPatch::Resolve { id, result })
            .is_stale();

        if applied {
            debug!(%id, in_flight = self.in_flight, "Completion applied");
        } else {
            info!(%id, "Completion for removed item, discarding");
        }
        Resolution { id, applied }
    }
}
