//! # Draw Commands
//!
//! Deferred draw requests, their culling bounds and the sort policies applied at flush.

use super::bitmap::{ImageHandle, SourceRect};
use super::color::Rgba;
use crate::PixelFwError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// What a command draws.
#[derive(Debug, Clone)]
pub enum CommandKind {
    /// Blit `source` of `image` with its top-left at the command position.
    Image {
        image: ImageHandle,
        source: SourceRect,
    },
    /// 1-pixel line from the command position to (`x1`, `y1`), camera-adjusted.
    Line { x1: f32, y1: f32 },
    /// Single opaque pixel at the command position.
    Pixel,
}

/// A draw request queued during a frame.
///
/// Positions are already camera-adjusted. `effective_y` is the pre-camera vertical
/// position and exists only for depth sorting.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub kind: CommandKind,
    pub x: f32,
    pub y: f32,
    pub color: Rgba,
    pub effective_y: f32,
}

/// Axis-aligned box used for culling, in back-buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl DrawCommand {
    /// Culling bounds: position plus source size for images, the endpoint box for lines.
    pub fn bounds(&self) -> Bounds {
        match &self.kind {
            CommandKind::Image { source, .. } => Bounds {
                x: self.x,
                y: self.y,
                w: source.w as f32,
                h: source.h as f32,
            },
            CommandKind::Line { x1, y1 } => Bounds {
                x: self.x.min(*x1),
                y: self.y.min(*y1),
                w: (x1 - self.x).abs(),
                h: (y1 - self.y).abs(),
            },
            CommandKind::Pixel => Bounds {
                x: self.x,
                y: self.y,
                w: 0.0,
                h: 0.0,
            },
        }
    }
}

/// Returns true when `bounds` overlaps the `[0, width) × [0, height)` viewport.
///
/// Edges are inclusive on the near side, so a box ending exactly at 0 is kept.
///
/// # Examples
///
/// ```
/// use pixelfw::{is_visible, Bounds};
///
/// let partly_left = Bounds { x: -10.0, y: 0.0, w: 16.0, h: 16.0 };
/// assert!(is_visible(partly_left, 320, 240));
///
/// let past_right = Bounds { x: 320.0, y: 0.0, w: 16.0, h: 16.0 };
/// assert!(!is_visible(past_right, 320, 240));
/// ```
pub fn is_visible(bounds: Bounds, width: u32, height: u32) -> bool {
    bounds.x + bounds.w >= 0.0
        && bounds.x < width as f32
        && bounds.y + bounds.h >= 0.0
        && bounds.y < height as f32
}

/// Order applied to the command list before culling and compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Submission order.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Reverse submission order.
    #[serde(rename = "back")]
    Back,
    /// Ascending effective y; equal keys keep submission order.
    #[serde(rename = "y")]
    Y,
    /// Descending effective y; equal keys keep submission order.
    #[serde(rename = "y-descending", alias = "y-")]
    YDescending,
}

impl SortMode {
    /// Reorders `commands` in place.
    pub(crate) fn apply(self, commands: &mut [DrawCommand]) {
        match self {
            SortMode::None => {}
            SortMode::Back => commands.reverse(),
            SortMode::Y => commands.sort_by(|a, b| a.effective_y.total_cmp(&b.effective_y)),
            SortMode::YDescending => {
                commands.sort_by(|a, b| b.effective_y.total_cmp(&a.effective_y))
            }
        }
    }

    /// Comparator form of the y modes, for callers composing their own ordering.
    pub fn compare(self, a: &DrawCommand, b: &DrawCommand) -> Ordering {
        match self {
            SortMode::Y => a.effective_y.total_cmp(&b.effective_y),
            SortMode::YDescending => b.effective_y.total_cmp(&a.effective_y),
            SortMode::None | SortMode::Back => Ordering::Equal,
        }
    }
}

impl FromStr for SortMode {
    type Err = PixelFwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(SortMode::None),
            "back" => Ok(SortMode::Back),
            "y" => Ok(SortMode::Y),
            "y-" | "y-descending" => Ok(SortMode::YDescending),
            other => Err(PixelFwError::InvalidConfig(format!(
                "unknown sort mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::None => "none",
            SortMode::Back => "back",
            SortMode::Y => "y",
            SortMode::YDescending => "y-descending",
        };
        f.write_str(name)
    }
}
