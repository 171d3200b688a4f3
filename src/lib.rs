// SPDX-License-Identifier: GPL-3.0-only

//! Fridgemate - photograph your fridge, get a recipe
//!
//! This library provides the core of the Fridgemate client: camera capture,
//! a single-slot staging area, a gallery of submitted photos and the
//! asynchronous calls to the ingredient detection and recipe generation
//! service.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: The orchestrator, gallery store and staging slot
//! - [`backends`]: Camera backend abstraction and capture session
//! - [`media`]: Image payloads and revocable preview handles
//! - [`pipelines`]: Still capture and recipe generation pipelines
//! - [`config`]: User configuration handling
//! - [`storage`]: Loading images from disk for upload
//!
//! # Example
//!
//! ```ignore
//! let config = fridgemate::Config::load()?;
//! let mut orchestrator = fridgemate::Orchestrator::from_config(&config)?;
//! let image = fridgemate::storage::load_source_image(path, config.max_upload_bytes).await?;
//! let id = orchestrator.submit_new(image);
//! orchestrator.settle().await;
//! println!("{:?}", orchestrator.gallery().get(id).and_then(|item| item.recipe()));
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{GalleryId, GalleryItem, ItemStatus, Orchestrator};
pub use config::Config;
pub use errors::{AppError, AppResult, CameraError, DetectionError};
pub use media::SourceImage;
pub use pipelines::recipe::{DetectedIngredient, Generation, Recipe, RecipeService};
