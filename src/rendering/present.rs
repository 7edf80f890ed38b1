//! # Presentation
//!
//! Display surfaces that receive the composited back-buffer, scaled up by the integer
//! pixel size with nearest-neighbor sampling.

use super::bitmap::Bitmap;
use macroquad::prelude::*;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// A display target for the finished back-buffer.
pub trait Presenter {
    /// Draws `back_buffer` scaled by `scale` with no smoothing.
    fn present(&mut self, back_buffer: &Bitmap, scale: u32);
}

/// CPU presenter that keeps the last presented frame in memory.
///
/// Useful for headless runs and tests. Clones share the same frame, so a caller can keep
/// one clone while the renderer owns another.
#[derive(Debug, Clone, Default)]
pub struct SoftwarePresenter {
    frame: Rc<RefCell<Bitmap>>,
    presented: Rc<RefCell<u64>>,
}

impl SoftwarePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently presented frame at display resolution.
    pub fn frame(&self) -> Ref<'_, Bitmap> {
        self.frame.borrow()
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        *self.presented.borrow()
    }
}

impl Presenter for SoftwarePresenter {
    fn present(&mut self, back_buffer: &Bitmap, scale: u32) {
        *self.frame.borrow_mut() = back_buffer.scale_nearest(scale);
        *self.presented.borrow_mut() += 1;
    }
}

/// Presenter that uploads the back-buffer to a macroquad texture each frame.
///
/// Must only be used inside a running macroquad window.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroquadPresenter {
    /// Screen-space offset of the drawn frame
    pub offset: (f32, f32),
}

impl MacroquadPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for MacroquadPresenter {
    fn present(&mut self, back_buffer: &Bitmap, scale: u32) {
        let texture = Texture2D::from_rgba8(
            back_buffer.width() as u16,
            back_buffer.height() as u16,
            back_buffer.pixels(),
        );
        texture.set_filter(FilterMode::Nearest);

        let scale = scale.max(1) as f32;
        draw_texture_ex(
            &texture,
            self.offset.0,
            self.offset.1,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(
                    back_buffer.width() as f32 * scale,
                    back_buffer.height() as f32 * scale,
                )),
                ..Default::default()
            },
        );
    }
}
