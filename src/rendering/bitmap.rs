//! # Pixel Buffers
//!
//! RGBA8 bitmaps used both as image sources and as the renderer's back-buffer, plus the
//! software compositing primitives that operate on them.

use super::color::{unit_to_byte, Rgba};
use crate::{PixelFwError, PixelFwResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Shared, immutable handle to a loaded image.
pub type ImageHandle = Arc<Bitmap>;

/// A rectangle inside a source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SourceRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// The whole of a `width` × `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// Alpha-blend one channel: `src * a + dst * (255 - a)`, divided by 255.
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Narrows the source span `[s0, s1)` to the part that lands inside `[0, limit)` when
/// source coordinate `origin` is drawn at `offset`. Returns an empty span if none does.
fn visible_span(s0: u32, s1: u32, origin: u32, offset: i32, limit: u32) -> (u32, u32) {
    let shift = offset as i64 - origin as i64;
    let lo = (s0 as i64).max(-shift);
    let hi = (s1 as i64).min(limit as i64 - shift);
    if lo >= hi {
        return (s0, s0);
    }
    (lo as u32, hi as u32)
}

/// RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Creates a fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Creates a bitmap with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let mut bitmap = Self::new(width, height);
        let bytes = color.to_rgba8();
        for px in bitmap.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        bitmap
    }

    /// Wraps raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> PixelFwResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PixelFwError::InvalidImage(format!(
                "{}x{} image needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Decodes an encoded image (PNG, BMP) from memory.
    pub fn decode(bytes: &[u8]) -> PixelFwResult<Self> {
        Ok(image::load_from_memory(bytes)?.to_rgba8().into())
    }

    /// Reads and decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> PixelFwResult<Self> {
        Ok(image::open(path)?.to_rgba8().into())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Reads one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(out)
    }

    /// Fills the whole buffer with an opaque color. Alpha in `color` is ignored.
    pub fn fill(&mut self, color: Rgba) {
        let [r, g, b, _] = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Raw pixel write: overwrites RGB and forces the pixel opaque.
    ///
    /// Writes outside the buffer are silently dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = rgb[0];
            self.pixels[idx + 1] = rgb[1];
            self.pixels[idx + 2] = rgb[2];
            self.pixels[idx + 3] = 255;
        }
    }

    /// Source-over blend of one RGBA8 pixel, scaled by `alpha` (0–255).
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4], alpha: u8) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let a = (rgba[3] as u16 * alpha as u16 + 127) / 255;
        if a == 0 {
            return;
        }
        let dst = &mut self.pixels[idx..idx + 4];
        if a == 255 {
            dst.copy_from_slice(&[rgba[0], rgba[1], rgba[2], 255]);
            return;
        }
        dst[0] = blend_channel(rgba[0], dst[0], a);
        dst[1] = blend_channel(rgba[1], dst[1], a);
        dst[2] = blend_channel(rgba[2], dst[2], a);
        dst[3] = (a + dst[3] as u16 * (255 - a) / 255) as u8;
    }

    /// Clips `rect` against this bitmap's extent, returning `(x0, y0, x1, y1)`.
    fn clip_source(&self, rect: SourceRect) -> (u32, u32, u32, u32) {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = rect.x.saturating_add(rect.w).min(self.width);
        let y1 = rect.y.saturating_add(rect.h).min(self.height);
        (x0, y0, x1, y1)
    }

    /// The part of `rect` that exists in `src` and lands inside this bitmap when drawn
    /// with its top-left at `(dx, dy)`, as source coordinates `(x0, y0, x1, y1)`.
    fn visible_source(
        &self,
        src: &Bitmap,
        rect: SourceRect,
        dx: i32,
        dy: i32,
    ) -> (u32, u32, u32, u32) {
        let (x0, y0, x1, y1) = src.clip_source(rect);
        let (x0, x1) = visible_span(x0, x1, rect.x, dx, self.width);
        let (y0, y1) = visible_span(y0, y1, rect.y, dy, self.height);
        (x0, y0, x1, y1)
    }

    /// Clips a segment to the buffer with Liang-Barsky, returning the surviving part.
    ///
    /// Runs in `f64` so endpoints millions of pixels away still clip to the right spot.
    fn clip_segment(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<(f64, f64, f64, f64)> {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let edges = [
            (-dx, x0),
            (dx, self.width as f64 - x0),
            (-dy, y0),
            (dy, self.height as f64 - y0),
        ];

        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
    }

    /// Copies `rect` of `src` to `(dx, dy)` at 1:1 scale with source-over blending.
    ///
    /// `alpha` multiplies every source pixel's own alpha. Parts of `rect` that fall
    /// outside `src` draw nothing.
    pub fn blit(&mut self, src: &Bitmap, rect: SourceRect, dx: i32, dy: i32, alpha: f32) {
        let alpha = unit_to_byte(alpha);
        if alpha == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.visible_source(src, rect, dx, dy);
        for sy in y0..y1 {
            let ty = dy + (sy - rect.y) as i32;
            for sx in x0..x1 {
                let tx = dx + (sx - rect.x) as i32;
                if let Some(px) = src.pixel(sx as i32, sy as i32) {
                    self.blend_pixel(tx, ty, px, alpha);
                }
            }
        }
    }

    /// Software sprite path: hard alpha cutout, tint multiply, opaque raw writes.
    ///
    /// Source pixels whose alpha is below `threshold` are skipped entirely; the rest are
    /// multiplied by `tint` and written through [`Bitmap::put_pixel`].
    pub fn blit_cutout(
        &mut self,
        src: &Bitmap,
        rect: SourceRect,
        dx: i32,
        dy: i32,
        tint: Rgba,
        threshold: f32,
    ) {
        let cutoff = unit_to_byte(threshold);
        let [tr, tg, tb, _] = tint.to_rgba8();
        let (x0, y0, x1, y1) = self.visible_source(src, rect, dx, dy);
        for sy in y0..y1 {
            for sx in x0..x1 {
                let Some(px) = src.pixel(sx as i32, sy as i32) else {
                    continue;
                };
                if px[3] < cutoff {
                    continue;
                }
                let rgb = [
                    ((px[0] as u16 * tr as u16) / 255) as u8,
                    ((px[1] as u16 * tg as u16) / 255) as u8,
                    ((px[2] as u16 * tb as u16) / 255) as u8,
                ];
                let tx = dx + (sx - rect.x) as i32;
                let ty = dy + (sy - rect.y) as i32;
                self.put_pixel(tx, ty, rgb);
            }
        }
    }

    /// Draws a 1-pixel line between two buffer-space points using Bresenham's algorithm.
    ///
    /// Endpoints are floored. The segment is clipped to the buffer first, so only the
    /// visible part is stepped no matter how far away the endpoints are.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return;
        }
        let Some((cx0, cy0, cx1, cy1)) =
            self.clip_segment(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
        else {
            return;
        };

        let (w, h) = (self.width as i64, self.height as i64);
        let (fx0, fy0) = (cx0.floor() as i64, cy0.floor() as i64);
        let (fx1, fy1) = (cx1.floor() as i64, cy1.floor() as i64);
        // A segment lying on the far edge clips to a zero-width strip outside the buffer.
        if (fx0 >= w && fx1 >= w) || (fy0 >= h && fy1 >= h) {
            return;
        }
        let (x0, y0) = (fx0.clamp(0, w - 1), fy0.clamp(0, h - 1));
        let (x1, y1) = (fx1.clamp(0, w - 1), fy1.clamp(0, h - 1));

        let rgba = color.to_rgba8();
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.blend_pixel(x as i32, y as i32, rgba, 255);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Nearest-neighbor integer upscale. A scale of 0 is treated as 1.
    pub fn scale_nearest(&self, scale: u32) -> Bitmap {
        let scale = scale.max(1);
        if scale == 1 {
            return self.clone();
        }
        let width = self.width * scale;
        let height = self.height * scale;
        let mut out = Bitmap::new(width, height);
        let src_row = self.width as usize * 4;
        for y in 0..height as usize {
            let row = &self.pixels[(y / scale as usize) * src_row..][..src_row];
            let dst_row = &mut out.pixels[y * width as usize * 4..][..width as usize * 4];
            for (x, px) in dst_row.chunks_exact_mut(4).enumerate() {
                let sx = (x / scale as usize) * 4;
                px.copy_from_slice(&row[sx..sx + 4]);
            }
        }
        out
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Bitmap::new(0, 0)
    }
}

impl From<image::RgbaImage> for Bitmap {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            pixels: img.into_raw(),
            width,
            height,
        }
    }
}
