//! # Framework Configuration
//!
//! Display, timing and rendering settings threaded through the frame loop.

use crate::rendering::{Compositing, SortMode};
use crate::{PixelFwError, PixelFwResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest accepted integer pixel scale.
pub const MIN_PIXEL_SIZE: u32 = 1;

/// Largest accepted integer pixel scale.
pub const MAX_PIXEL_SIZE: u32 = 4;

/// Fixed simulation step in seconds.
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Default display width in pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default display height in pixels
pub const DEFAULT_HEIGHT: u32 = 600;

/// Configuration for a framework instance.
///
/// Every field has a default, so a JSON file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use pixelfw::FrameworkConfig;
///
/// let config = FrameworkConfig::from_json_str(r#"{ "pixel_size": 2 }"#).unwrap();
/// assert_eq!(config.pixel_size, 2);
/// assert_eq!(config.width, 800);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Window title
    pub title: String,
    /// Display width in pixels
    pub width: u32,
    /// Display height in pixels
    pub height: u32,
    /// Integer upscale factor from back-buffer to display
    pub pixel_size: u32,
    /// Seconds advanced per frame
    pub time_step: f32,
    /// Sort policy applied when the game flushes with the configured mode
    pub sort: SortMode,
    /// How image commands are composited onto the back-buffer
    pub compositing: Compositing,
    /// Directory that relative asset paths are resolved against
    pub asset_dir: PathBuf,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            title: "Pixelfw".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_size: MIN_PIXEL_SIZE,
            time_step: TIME_STEP,
            sort: SortMode::None,
            compositing: Compositing::Blend,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl FrameworkConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> PixelFwResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> PixelFwResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Checks that the values describe a usable display.
    ///
    /// The pixel size is clamped by the renderer rather than rejected here.
    pub fn validate(&self) -> PixelFwResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PixelFwError::InvalidConfig(format!(
                "display size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(PixelFwError::InvalidConfig(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if let Compositing::Cutout { threshold } = self.compositing {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(PixelFwError::InvalidConfig(format!(
                    "cutout threshold must be within [0, 1], got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    /// Resolves an asset path relative to `asset_dir`.
    pub fn asset_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(file)
    }
}
