//! # Pixelfw
//!
//! A small 2D game framework for pixel-art games, built around a batched command renderer.
//!
//! ## Architecture Overview
//!
//! The framework is organized around a handful of cooperating pieces:
//!
//! - **Rendering**: a deferred command renderer that sorts, culls and composites draw
//!   requests onto a low-resolution back-buffer, then upscales it to the display
//! - **Content**: named image assets, loaded concurrently and joined before the game starts
//! - **Game**: the frame loop, entity lifecycle, timers and animators
//! - **Input**: per-frame mouse and keyboard state, mapped into world space
//! - **Demo**: the isometric board game that ships with the binary
//!
//! ## Frame Model
//!
//! Everything runs on one thread. Each frame the game updates, entities update, the game
//! submits draw commands and finally flushes the renderer exactly once.

pub mod config;
pub mod content;
pub mod demo;
pub mod game;
pub mod input;
pub mod rendering;
pub mod utils;

pub use config::FrameworkConfig;
pub use content::{ContentHandler, LoadReport};
pub use game::{
    Animator, Entity, EntityHandler, EntityId, FrameContext, Framework, Game, Timer,
};
pub use input::{InputState, MouseButtonIndex};
pub use rendering::{
    is_visible, tile_source, Bitmap, Bounds, Camera, CommandKind, Compositing, DrawCommand,
    FlushOptions, FlushStats, ImageHandle, MacroquadPresenter, Presenter, Renderer, Rgba,
    SoftwarePresenter, SortMode, SourceRect,
};
pub use utils::*;

/// Core error type for the Pixelfw framework.
#[derive(thiserror::Error, Debug)]
pub enum PixelFwError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Image decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A named asset was never loaded
    #[error("Asset not loaded: {0}")]
    AssetMissing(String),

    /// Raw pixel data does not match the declared dimensions
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Result type used throughout the Pixelfw codebase.
pub type PixelFwResult<T> = Result<T, PixelFwError>;

/// Version information for the framework.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
