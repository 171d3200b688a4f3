// SPDX-License-Identifier: GPL-3.0-only

//! Recipe generation pipeline
//!
//! Each dispatched image becomes one independent task on the Tokio runtime.
//! Completions are reported back over a channel tagged with the gallery id
//! they were dispatched for; the receiver decides whether the result still
//! applies. Nothing here touches gallery state.

pub mod client;
pub mod response;

pub use client::{HttpRecipeService, RecipeService};
pub use response::{DetectedIngredient, Generation, Recipe, interpret_response};

use crate::app::GalleryId;
use crate::errors::{AppResult, DetectionError};
use crate::media::SourceImage;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Result of one dispatched call
#[derive(Debug)]
pub struct ProcessingOutcome {
    pub id: GalleryId,
    pub result: Result<Generation, DetectionError>,
}

/// Fans images out to the recipe service
pub struct ProcessingPipeline {
    service: Arc<dyn RecipeService>,
    completions: mpsc::UnboundedSender<ProcessingOutcome>,
    runtime: Handle,
}

impl ProcessingPipeline {
    /// Create a pipeline reporting into `completions`
    ///
    /// Must be called from within a Tokio runtime; tasks are spawned on it.
    pub fn new(
        service: Arc<dyn RecipeService>,
        completions: mpsc::UnboundedSender<ProcessingOutcome>,
    ) -> AppResult<Self> {
        let runtime =
            Handle::try_current().map_err(|e| format!("No Tokio runtime available: {}", e))?;
        Ok(Self {
            service,
            completions,
            runtime,
        })
    }

    /// Start a call for `id`; the outcome arrives on the completion channel
    ///
    /// Exactly one outcome is sent per dispatch. A call that panics is
    /// reported as a transport failure.
    pub fn dispatch(&self, id: GalleryId, image: SourceImage) -> JoinHandle<()> {
        let call = self.service.detect_and_generate(image);
        let completions = self.completions.clone();

        debug!(%id, "Dispatching recipe request");
        self.runtime.spawn(async move {
            let result = match AssertUnwindSafe(call).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    error!(%id, "Recipe request panicked");
                    Err(DetectionError::Transport(
                        "Recipe request aborted unexpectedly".to_string(),
                    ))
                }
            };
            if let Err(e) = &result {
                warn!(%id, error = %e, "Recipe request failed");
            }
            if completions.send(ProcessingOutcome { id, result }).is_err() {
                debug!(%id, "Completion receiver gone, dropping outcome");
            }
        })
    }
}

impl std::fmt::Debug for ProcessingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingPipeline").finish_non_exhaustive()
    }
}
