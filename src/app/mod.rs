// SPDX-License-Identifier: GPL-3.0-only

//! Photo-to-recipe orchestration
//!
//! The [`Orchestrator`] owns every piece of mutable state: the gallery, the
//! staging slot, the preview registry, the camera session and the selection
//! pointer. All of it is mutated from one logical thread through `&mut self`.
//! The only concurrent work is the recipe service call, which runs as a Tokio
//! task and reports back over a channel; its result is applied by id when
//! the owner calls [`Orchestrator::next_completion`] or
//! [`Orchestrator::drain_completions`].
//!
//! # Architecture
//!
//! - `state`: Gallery item types (`GalleryId`, `GalleryItem`, `ItemStatus`)
//! - `gallery`: Id-keyed store with patch application and change feed
//! - `staging`: Single pending selection awaiting confirmation
//! - `handlers`: Orchestrator operations grouped by concern

pub mod gallery;
mod handlers;
pub mod staging;
pub mod state;

pub use gallery::{ChangeKind, GalleryChange, GalleryPatch, GalleryStore, PatchOutcome};
pub use handlers::processing::Resolution;
pub use staging::{StagedOrigin, StagedSelection, StagingSlot};
pub use state::{GalleryId, GalleryItem, ItemStatus};

use crate::backends::camera::{self, MediaCaptureSession};
use crate::config::Config;
use crate::errors::AppResult;
use crate::media::ResourceRegistry;
use crate::pipelines::recipe::{
    HttpRecipeService, ProcessingOutcome, ProcessingPipeline, RecipeService,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Coordinates capture, staging, gallery and recipe generation
pub struct Orchestrator {
    gallery: GalleryStore,
    staging: StagingSlot,
    registry: ResourceRegistry,
    camera: MediaCaptureSession,
    pipeline: ProcessingPipeline,
    completions: mpsc::UnboundedReceiver<ProcessingOutcome>,
    selected: Option<GalleryId>,
    in_flight: usize,
}

impl Orchestrator {
    /// Create an orchestrator; must be called from within a Tokio runtime
    pub fn new(service: Arc<dyn RecipeService>, camera: MediaCaptureSession) -> AppResult<Self> {
        let (sender, completions) = mpsc::unbounded_channel();
        let pipeline = ProcessingPipeline::new(service, sender)?;

        Ok(Self {
            gallery: GalleryStore::new(),
            staging: StagingSlot::new(),
            registry: ResourceRegistry::new(),
            camera,
            pipeline,
            completions,
            selected: None,
            in_flight: 0,
        })
    }

    /// HTTP recipe service and camera backend taken from `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let service = HttpRecipeService::from_config(config)?;
        let camera = MediaCaptureSession::new(camera::get_backend(config), config.jpeg_quality);
        info!(endpoint = service.endpoint(), backend = %camera.backend_type(), "Orchestrator ready");
        Self::new(Arc::new(service), camera)
    }

    pub fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    pub fn staging(&self) -> &StagingSlot {
        &self.staging
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &MediaCaptureSession {
        &self.camera
    }

    /// Id the selection pointer is on
    pub fn selected(&self) -> Option<GalleryId> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&GalleryItem> {
        self.selected.and_then(|id| self.gallery.get(id))
    }

    /// Preview locator of the staged image, owned or borrowed
    pub fn staged_preview_url(&self) -> Option<&str> {
        match self.staging.current()? {
            StagedSelection::New { preview, .. } => Some(preview.url()),
            StagedSelection::Existing { id, .. } => {
                self.gallery.get(*id).map(|item| item.preview().url())
            }
        }
    }

    /// Calls dispatched whose results have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Tear everything down, releasing every preview handle
    ///
    /// Outstanding calls keep running but their results find no item and are
    /// discarded. Safe to call more than once; also runs on drop.
    pub fn shutdown(&mut self) {
        self.staging.cancel(&mut self.registry);
        self.camera.stop();
        for item in self.gallery.take_all() {
            self.registry.release(item.into_preview());
        }
        self.selected = None;

        info!(
            acquired = self.registry.acquired_count(),
            released = self.registry.released_count(),
            outstanding = self.registry.outstanding(),
            abandoned_calls = self.in_flight,
            "Orchestrator shut down"
        );
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        debug!("Dropping orchestrator");
        self.shutdown();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("gallery", &self.gallery)
            .field("staging", &self.staging)
            .field("registry", &self.registry)
            .field("camera", &self.camera)
            .field("selected", &self.selected)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
