//! # Camera
//!
//! A 2D world-space offset applied to draw requests as they are submitted.

/// Camera centered on a world-space point.
///
/// The viewport half extents are fixed when the camera is created. The camera is read on
/// every draw call, so moving it mid-frame only affects commands issued afterwards.
///
/// # Examples
///
/// ```
/// use pixelfw::Camera;
///
/// let mut camera = Camera::new(800, 600);
/// camera.set_center(20.0, 10.0);
/// assert_eq!(camera.origin(), (-380.0, -290.0));
///
/// camera.set_apply(false);
/// assert_eq!(camera.origin(), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center_x: f32,
    center_y: f32,
    half_width: f32,
    half_height: f32,
    apply: bool,
}

impl Camera {
    /// Creates a camera for a viewport of `width` × `height` back-buffer pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            half_width: (width / 2) as f32,
            half_height: (height / 2) as f32,
            apply: true,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center_x = x;
        self.center_y = y;
    }

    /// Whether the offset is applied. When disabled, draw calls land in screen space.
    pub fn applies(&self) -> bool {
        self.apply
    }

    pub fn set_apply(&mut self, apply: bool) {
        self.apply = apply;
    }

    /// Top-left corner of the view in world space, or `(0, 0)` in passthrough mode.
    pub fn origin(&self) -> (f32, f32) {
        if !self.apply {
            return (0.0, 0.0);
        }
        (
            self.center_x - self.half_width,
            self.center_y - self.half_height,
        )
    }
}
