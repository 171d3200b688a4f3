// SPDX-License-Identifier: GPL-3.0-only

//! Revocable preview handles
//!
//! A [`PreviewHandle`] is a local reference to an image payload that the
//! display layer can resolve without touching the original source. Handles are
//! not `Clone`: [`ResourceRegistry::release`] consumes them, so releasing the
//! same handle twice does not type-check. Whoever holds the handle owns the
//! obligation to release it.

use crate::media::SourceImage;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Source of handle ids, shared by every registry in the process
static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Owned reference to a registered preview
#[must_use = "preview handles must be released through the registry"]
pub struct PreviewHandle {
    id: u64,
    url: String,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Opaque locator the display layer uses to find the bytes
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PreviewHandle({})", self.url)
    }
}

/// Issues and revokes preview handles
///
/// The registry only counts and resolves; it does not decide when a handle is
/// released. That follows from ownership of the handle value.
#[derive(Default)]
pub struct ResourceRegistry {
    live: HashMap<u64, Arc<[u8]>>,
    acquired: u64,
    released: u64,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `image`
    pub fn acquire(&mut self, image: &SourceImage) -> PreviewHandle {
        let id = NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:fridgemate/{}", uuid::Uuid::new_v4());

        self.live.insert(id, image.shared_bytes());
        self.acquired += 1;

        debug!(id, name = image.name(), bytes = image.len(), "Preview handle acquired");
        PreviewHandle { id, url }
    }

    /// Revoke a preview
    pub fn release(&mut self, handle: PreviewHandle) {
        match self.live.remove(&handle.id) {
            Some(_) => {
                self.released += 1;
                debug!(id = handle.id, "Preview handle released");
            }
            None => {
                warn!(id = handle.id, url = %handle.url, "Released a handle this registry never issued");
            }
        }
    }

    /// Bytes behind a live handle
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<&[u8]> {
        self.live.get(&handle.id).map(|bytes| bytes.as_ref())
    }

    /// Handles acquired but not yet released
    pub fn outstanding(&self) -> usize {
        self.live.len()
    }

    /// Total number of handles ever acquired
    pub fn acquired_count(&self) -> u64 {
        self.acquired
    }

    /// Total number of handles released
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("outstanding", &self.live.len())
            .field("acquired", &self.acquired)
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            warn!(outstanding = self.live.len(), "Preview registry dropped with live handles");
        }
    }
}
