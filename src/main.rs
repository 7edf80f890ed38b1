//! # Pixelfw Main Entry Point
//!
//! Loads the configuration, opens the macroquad window and runs the board game demo.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::request_new_screen_size;
use pixelfw::demo::BoardGame;
use pixelfw::{Framework, FrameworkConfig, MacroquadPresenter, PixelFwResult, SortMode};
use std::path::PathBuf;

/// Command line arguments for the Pixelfw demo.
#[derive(Parser, Debug)]
#[command(name = "pixelfw")]
#[command(about = "Pixel-art 2D game framework with a batched command renderer")]
#[command(version)]
struct Args {
    /// Random seed for tree placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in screen pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in screen pixels
    #[arg(long)]
    height: Option<u32>,

    /// Size of one logical pixel (1-4)
    #[arg(long)]
    pixel_size: Option<u32>,

    /// Draw order applied at flush (none, back, y, y-descending)
    #[arg(long)]
    sort: Option<SortMode>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Pixelfw")]
async fn main() -> PixelFwResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Pixelfw v{}", pixelfw::VERSION);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Running board game with seed {}", seed);

    request_new_screen_size(config.width as f32, config.height as f32);

    let framework = Framework::new(config, Box::new(MacroquadPresenter::new()))?;
    let result = framework.run(BoardGame::new(seed)).await;
    if let Err(e) = &result {
        error!("Game stopped with an error: {}", e);
    }
    result
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG` takes precedence over `--log-level` when set.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        tracing::debug!("tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .parse_default_env()
            .init();
    }
}

/// Layers the config file (if any) and command line overrides over the defaults.
fn build_config(args: &Args) -> PixelFwResult<FrameworkConfig> {
    let mut config = match &args.config {
        Some(path) => FrameworkConfig::from_file(path)?,
        None => FrameworkConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(pixel_size) = args.pixel_size {
        config.pixel_size = pixel_size;
    }
    if let Some(sort) = args.sort {
        config.sort = sort;
    }

    config.validate()?;
    Ok(config)
}
