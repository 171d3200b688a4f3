// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use fridgemate::backends::camera::CameraBackendType;
use fridgemate::config::Config;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "fridgemate")]
#[command(about = "Photograph your fridge and get a recipe")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Detection/generation endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Give up on a request after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Camera backend (v4l2 or still)
    #[arg(long, global = true)]
    backend: Option<CameraBackendType>,

    /// Camera device path (e.g. /dev/video0)
    #[arg(long, global = true)]
    device: Option<String>,

    /// Image served by the still-image backend
    #[arg(long, global = true)]
    image: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload photos and print the generated recipes
    Submit {
        /// Image files to submit
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Take a photo with the camera and print the generated recipe
    Scan,

    /// List available cameras
    Devices,
}

impl Cli {
    /// Apply command-line overrides on top of the stored configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        if let Some(backend) = self.backend {
            config.camera_backend = backend;
        }
        if let Some(device) = &self.device {
            config.camera_device = Some(device.clone());
        }
        if let Some(image) = &self.image {
            config.still_image_path = Some(image.clone());
            if self.backend.is_none() {
                config.camera_backend = CameraBackendType::StillImage;
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=fridgemate=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply_to(&mut config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Submit { files } => Ok(runtime.block_on(cli::submit_files(&config, files))?),
        Commands::Scan => Ok(runtime.block_on(cli::scan(&config))?),
        Commands::Devices => cli::list_devices(&config),
    }
}
