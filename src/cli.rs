// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Submitting image files for recipe generation
//! - Scanning with the camera
//! - Listing available cameras

use fridgemate::app::{GalleryId, ItemStatus, Orchestrator};
use fridgemate::backends::camera;
use fridgemate::config::Config;
use fridgemate::errors::AppResult;
use fridgemate::storage::load_source_image;
use std::path::PathBuf;

/// List the cameras visible to the configured backend
pub fn list_devices(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let backend = camera::get_backend(config);
    let cameras = backend.enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found ({} backend).", backend.backend_type());
        return Ok(());
    }

    println!("Available cameras ({} backend):", backend.backend_type());
    println!();
    for (index, device) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, device.name);
        println!("      Path: {}", device.path);
        if let Some(location) = &device.location {
            println!("      Location: {}", location);
        }
    }

    Ok(())
}

/// Submit each file and print the recipes as they come back
pub async fn submit_files(config: &Config, files: Vec<PathBuf>) -> AppResult<()> {
    let mut orchestrator = Orchestrator::from_config(config)?;
    let mut submitted = Vec::new();

    for path in &files {
        match load_source_image(path, config.max_upload_bytes).await {
            Ok(image) => {
                println!("Submitting {} ({} bytes)", image.name(), image.len());
                let id = orchestrator.submit_new(image);
                if !submitted.contains(&id) {
                    submitted.push(id);
                }
            }
            Err(e) => eprintln!("Skipping {}: {}", path.display(), e),
        }
    }

    if submitted.is_empty() {
        return Err("No images could be submitted".into());
    }

    println!("Waiting for {} request(s)...", orchestrator.in_flight());
    orchestrator.settle().await;

    for id in submitted {
        print_item(&orchestrator, id);
    }

    Ok(())
}

/// Capture one photo, confirm it and print the result
pub async fn scan(config: &Config) -> AppResult<()> {
    let mut orchestrator = Orchestrator::from_config(config)?;

    let viewport = orchestrator
        .start_camera()
        .inspect_err(|e| eprintln!("{}", e.user_notice()))?;
    let (width, height) = viewport.raster_size();
    println!("Camera started ({}x{})", width, height);

    orchestrator
        .capture_and_stage()
        .inspect_err(|e| eprintln!("{}", e.user_notice()))?;
    let id = orchestrator
        .confirm_staged()
        .ok_or("Nothing was captured")?;

    println!("Photo captured, generating recipe...");
    orchestrator.settle().await;
    print_item(&orchestrator, id);

    Ok(())
}

fn print_item(orchestrator: &Orchestrator, id: GalleryId) {
    let Some(item) = orchestrator.gallery().get(id) else {
        return;
    };

    println!();
    println!("== {} ==", item.source().name());
    match item.status() {
        ItemStatus::Processing => println!("Still processing."),
        ItemStatus::Error(message) => println!("Error: {}", message),
        ItemStatus::Done(generation) => {
            let recipe = &generation.recipe;
            println!("{}", recipe.title);

            if !generation.detected.is_empty() {
                let detected: Vec<String> = generation
                    .detected
                    .iter()
                    .map(|d| format!("{} x{}", d.name, d.count))
                    .collect();
                println!();
                println!("Detected: {}", detected.join(", "));
            }

            println!();
            println!("Ingredients:");
            for ingredient in &recipe.ingredients {
                println!("  - {}", ingredient);
            }

            println!();
            println!("Steps:");
            for (index, step) in recipe.steps.iter().enumerate() {
                println!("  {}. {}", index + 1, step);
            }
        }
    }
}
