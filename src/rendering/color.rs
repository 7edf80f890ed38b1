//! # Colors
//!
//! Normalized RGBA colors. All renderer inputs use 0.0–1.0 channels; conversion to and
//! from 0–255 bytes happens only at the pixel buffer boundary.

use serde::{Deserialize, Serialize};

/// RGBA color with normalized `f32` channels.
///
/// # Examples
///
/// ```
/// use pixelfw::Rgba;
///
/// let orange = Rgba::from_rgb8(255, 128, 0);
/// assert_eq!(orange.to_rgba8(), [255, 128, 0, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from normalized channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque color from 0–255 channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Converts to bytes, clamping every channel into range first.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            unit_to_byte(self.r),
            unit_to_byte(self.g),
            unit_to_byte(self.b),
            unit_to_byte(self.a),
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Maps a normalized channel onto 0–255, rounding to nearest.
#[inline]
pub(crate) fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip_of_extremes() {
        assert_eq!(Rgba::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Rgba::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_range_channels_clamp() {
        let c = Rgba::new(2.0, -1.0, 0.5, 1.5);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_default_tint_is_opaque_white() {
        assert_eq!(Rgba::default(), Rgba::WHITE);
        assert_eq!(Rgba::from_rgb8(0, 0, 0).with_alpha(0.5).a, 0.5);
    }
}
