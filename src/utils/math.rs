//! # Game Mathematics
//!
//! Isometric projection helpers and a small 2×2 matrix type.

use serde::{Deserialize, Serialize};

/// Projects an isometric world point onto the screen, with `z` pointing up.
///
/// # Examples
///
/// ```
/// use pixelfw::isometric_to_screen;
///
/// assert_eq!(isometric_to_screen(10.0, 4.0, 2.0), (6.0, 5.0));
/// ```
pub fn isometric_to_screen(x: f32, y: f32, z: f32) -> (f32, f32) {
    (x - y, (x + y) / 2.0 - z)
}

/// Inverse of [`isometric_to_screen`] on the `z = 0` plane.
pub fn isometric_from_screen(x: f32, y: f32) -> (f32, f32) {
    ((2.0 * y + x) / 2.0, (2.0 * y - x) / 2.0)
}

/// Row-major 2×2 matrix `[m00, m01, m10, m11]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat2(pub [f32; 4]);

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2([1.0, 0.0, 0.0, 1.0]);

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Mat2([sx, 0.0, 0.0, sy])
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat2([c, -s, s, c])
    }

    pub fn determinant(self) -> f32 {
        let [a, b, c, d] = self.0;
        a * d - b * c
    }

    /// Inverse, or `None` for a singular matrix.
    pub fn inverse(self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let [a, b, c, d] = self.0;
        let inv = 1.0 / det;
        Some(Mat2([d * inv, -b * inv, -c * inv, a * inv]))
    }

    pub fn transform(self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d] = self.0;
        (a * x + b * y, c * x + d * y)
    }
}

impl std::ops::Mul for Mat2 {
    type Output = Mat2;

    fn mul(self, other: Mat2) -> Mat2 {
        let [a, b, c, d] = self.0;
        let [e, f, g, h] = other.0;
        Mat2([
            a * e + b * g,
            a * f + b * h,
            c * e + d * g,
            c * f + d * h,
        ])
    }
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
