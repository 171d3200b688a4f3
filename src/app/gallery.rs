// SPDX-License-Identifier: GPL-3.0-only

//! Gallery store
//!
//! Holds the submitted items newest first. All mutation goes through
//! [`GalleryStore::apply`], which targets items by id and re-checks that the
//! item still exists at the moment the patch lands. A patch for a removed item
//! is dropped: results never bring an item back.
//!
//! Every applied patch bumps the revision and is announced to subscribers.

use super::state::{GalleryId, GalleryItem, ItemStatus};
use crate::media::SourceImage;
use crate::pipelines::recipe::Generation;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Capacity of the change feed; slow subscribers see `Lagged`
const CHANGE_FEED_CAPACITY: usize = 64;

/// A single id-targeted mutation
#[derive(Debug)]
pub enum GalleryPatch {
    /// Add a new item at the front
    Insert(GalleryItem),
    /// Put an existing item back into `Processing`, discarding its last result
    BeginProcessing(GalleryId),
    /// Record the outcome of a call; `Err` carries the user-facing message
    Resolve {
        id: GalleryId,
        result: Result<Generation, String>,
    },
    /// Drop an item
    Remove(GalleryId),
}

impl GalleryPatch {
    pub fn target(&self) -> GalleryId {
        match self {
            GalleryPatch::Insert(item) => item.id(),
            GalleryPatch::BeginProcessing(id)
            | GalleryPatch::Resolve { id, .. }
            | GalleryPatch::Remove(id) => *id,
        }
    }
}

/// What happened to a patch
#[derive(Debug)]
pub enum PatchOutcome {
    Applied,
    /// The item was taken out of the store; its preview must be released
    Removed(GalleryItem),
    /// The target no longer exists; nothing changed
    Stale,
}

impl PatchOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, PatchOutcome::Stale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    ProcessingStarted,
    Resolved,
    Removed,
}

/// Notification sent to subscribers after each applied patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryChange {
    pub revision: u64,
    pub id: GalleryId,
    pub kind: ChangeKind,
}

/// Ordered collection of gallery items
pub struct GalleryStore {
    items: Vec<GalleryItem>,
    revision: u64,
    changes: broadcast::Sender<GalleryChange>,
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            items: Vec::new(),
            revision: 0,
            changes,
        }
    }

    /// Receive a [`GalleryChange`] for every future applied patch
    pub fn subscribe(&self) -> broadcast::Receiver<GalleryChange> {
        self.changes.subscribe()
    }

    /// Number of applied patches so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items, newest first
    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<GalleryId> {
        self.items.iter().map(GalleryItem::id).collect()
    }

    pub fn get(&self, id: GalleryId) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: GalleryId) -> bool {
        self.get(id).is_some()
    }

    /// Existing item that `image` would be a re-submission of
    pub fn find_duplicate(&self, image: &SourceImage) -> Option<GalleryId> {
        self.items
            .iter()
            .find(|item| item.source().is_duplicate_of(image))
            .map(GalleryItem::id)
    }

    /// Apply one patch against the current state
    pub fn apply(&mut self, patch: GalleryPatch) -> PatchOutcome {
        let id = patch.target();

        let (outcome, kind) = match patch {
            GalleryPatch::Insert(item) => {
                info!(%id, name = item.source().name(), "Adding gallery item");
                self.items.insert(0, item);
                (PatchOutcome::Applied, ChangeKind::Inserted)
            }
            GalleryPatch::BeginProcessing(id) => match self.position(id) {
                Some(index) => {
                    self.items[index].set_status(ItemStatus::Processing);
                    (PatchOutcome::Applied, ChangeKind::ProcessingStarted)
                }
                None => return self.stale(id),
            },
            GalleryPatch::Resolve { id, result } => match self.position(id) {
                Some(index) => {
                    let status = match result {
                        Ok(generation) => ItemStatus::Done(generation),
                        Err(message) => ItemStatus::Error(message),
                    };
                    info!(%id, status = status.label(), "Gallery item resolved");
                    self.items[index].set_status(status);
                    (PatchOutcome::Applied, ChangeKind::Resolved)
                }
                None => return self.stale(id),
            },
            GalleryPatch::Remove(id) => match self.position(id) {
                Some(index) => {
                    info!(%id, "Removing gallery item");
                    (PatchOutcome::Removed(self.items.remove(index)), ChangeKind::Removed)
                }
                None => return self.stale(id),
            },
        };

        self.revision += 1;
        // No subscribers is fine
        let _ = self.changes.send(GalleryChange {
            revision: self.revision,
            id,
            kind,
        });
        outcome
    }

    /// Remove every item, newest first
    pub fn take_all(&mut self) -> Vec<GalleryItem> {
        let mut taken = Vec::with_capacity(self.items.len());
        for id in self.ids() {
            if let PatchOutcome::Removed(item) = self.apply(GalleryPatch::Remove(id)) {
                taken.push(item);
            }
        }
        taken
    }

    fn position(&self, id: GalleryId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn stale(&self, id: GalleryId) -> PatchOutcome {
        debug!(%id, "Patch targets a missing item, discarding");
        PatchOutcome::Stale
    }
}

impl std::fmt::Debug for GalleryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryStore")
            .field("items", &self.items.len())
            .field("revision", &self.revision)
            .finish()
    }
}
