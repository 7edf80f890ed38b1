//! # Command Renderer
//!
//! Collects draw requests during a frame and realizes them in one flush: sort, cull
//! against the back-buffer, composite, then present upscaled.

use super::bitmap::{Bitmap, ImageHandle, SourceRect};
use super::camera::Camera;
use super::color::Rgba;
use super::command::{is_visible, CommandKind, DrawCommand, SortMode};
use super::present::Presenter;
use crate::config::{FrameworkConfig, MAX_PIXEL_SIZE, MIN_PIXEL_SIZE};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// How image commands are written into the back-buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compositing {
    /// Source-over blending; the tint's alpha scales the whole sprite.
    #[default]
    Blend,
    /// Per-pixel software path: hard alpha cutout at `threshold`, RGB multiplied by the
    /// tint, every surviving pixel written opaque.
    Cutout { threshold: f32 },
}

/// Parameters for [`Renderer::flush_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOptions {
    pub sort: SortMode,
    /// When set, the camera application flag is switched to this value once the frame
    /// has been presented.
    pub apply_camera: Option<bool>,
}

impl From<SortMode> for FlushOptions {
    fn from(sort: SortMode) -> Self {
        Self {
            sort,
            apply_camera: None,
        }
    }
}

/// Counts from a single flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
    /// Commands pending when the flush started
    pub submitted: usize,
    /// Commands dropped because they lay outside the back-buffer
    pub culled: usize,
    /// Commands that passed the cull and were composited. One that only touches the
    /// viewport edge, such as a pixel at x = -0.5, counts here but writes nothing.
    pub drawn: usize,
}

/// Computes the source rectangle of cell `index` in a `rows` × `cols` sprite sheet.
///
/// Cell size is the sheet size divided by the grid, rounded down. Indices past the last
/// cell are not rejected; they map to rows below the sheet and draw nothing. A zero
/// `rows` or `cols` is treated as 1.
///
/// # Examples
///
/// ```
/// use pixelfw::{tile_source, SourceRect};
///
/// assert_eq!(tile_source(256, 32, 3, 1, 8), SourceRect::new(96, 0, 32, 32));
/// ```
pub fn tile_source(image_width: u32, image_height: u32, index: u32, rows: u32, cols: u32) -> SourceRect {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let tile_w = image_width / cols;
    let tile_h = image_height / rows;
    SourceRect::new((index % cols) * tile_w, (index / cols) * tile_h, tile_w, tile_h)
}

/// Deferred renderer with a low-resolution back-buffer.
///
/// Submissions only append to the command list. Nothing touches the back-buffer until
/// [`Renderer::flush`], except [`Renderer::clear`] which fills it immediately.
///
/// # Examples
///
/// ```
/// use pixelfw::{Bitmap, Renderer, Rgba, SoftwarePresenter, SortMode};
/// use std::sync::Arc;
///
/// let mut renderer = Renderer::new(640, 480, 2, Box::new(SoftwarePresenter::new()));
/// assert_eq!((renderer.width(), renderer.height()), (320, 240));
///
/// let sprite = Arc::new(Bitmap::filled(8, 8, Rgba::WHITE));
/// renderer.clear(Rgba::BLACK);
/// renderer.sprite(&sprite, 160.0, 120.0, 0.5, 0.5);
/// let stats = renderer.flush(SortMode::Y);
/// assert_eq!(stats.drawn, 1);
/// assert!(renderer.commands().is_empty());
/// ```
pub struct Renderer {
    back_buffer: Bitmap,
    pixel_size: u32,
    camera: Camera,
    commands: Vec<DrawCommand>,
    compositing: Compositing,
    presenter: Box<dyn Presenter>,
}

impl Renderer {
    /// Creates a renderer for a `width` × `height` display.
    ///
    /// `pixel_size` is clamped to [1, 4]; the back-buffer is the display size divided by
    /// it, rounded down.
    pub fn new(width: u32, height: u32, pixel_size: u32, presenter: Box<dyn Presenter>) -> Self {
        let pixel_size = pixel_size.clamp(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE);
        let back_width = width / pixel_size;
        let back_height = height / pixel_size;
        log::debug!(
            "Renderer created: display {}x{}, back-buffer {}x{}, pixel size {}",
            width,
            height,
            back_width,
            back_height,
            pixel_size
        );

        Self {
            back_buffer: Bitmap::new(back_width, back_height),
            pixel_size,
            camera: Camera::new(back_width, back_height),
            commands: Vec::new(),
            compositing: Compositing::default(),
            presenter,
        }
    }

    /// Creates a renderer sized and configured from `config`.
    pub fn from_config(config: &FrameworkConfig, presenter: Box<dyn Presenter>) -> Self {
        Self::new(config.width, config.height, config.pixel_size, presenter)
            .with_compositing(config.compositing)
    }

    pub fn with_compositing(mut self, compositing: Compositing) -> Self {
        self.compositing = compositing;
        self
    }

    /// Back-buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.back_buffer.width()
    }

    /// Back-buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.back_buffer.height()
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn compositing(&self) -> Compositing {
        self.compositing
    }

    pub fn set_compositing(&mut self, compositing: Compositing) {
        self.compositing = compositing;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Centers the camera on a world-space point.
    pub fn set_camera(&mut self, x: f32, y: f32) {
        self.camera.set_center(x, y);
    }

    /// Enables or disables the camera offset for subsequent submissions.
    pub fn set_apply_camera(&mut self, apply: bool) {
        self.camera.set_apply(apply);
    }

    /// Commands submitted since the last flush, in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn back_buffer(&self) -> &Bitmap {
        &self.back_buffer
    }

    /// Queues a sprite blit.
    ///
    /// `(ox, oy)` is a normalized anchor inside the source rectangle: `(0.5, 0.5)` centers
    /// the sprite on `(x, y)`. `source` defaults to the whole image and `color` to opaque
    /// white.
    #[allow(clippy::too_many_arguments)]
    pub fn raw(
        &mut self,
        image: &ImageHandle,
        x: f32,
        y: f32,
        ox: f32,
        oy: f32,
        source: Option<SourceRect>,
        color: Option<Rgba>,
    ) {
        let source = source.unwrap_or_else(|| SourceRect::full(image.width(), image.height()));
        let ix = x - (source.w as f32 * ox).floor();
        let iy = y - (source.h as f32 * oy).floor();
        let (cx, cy) = self.camera.origin();

        self.commands.push(DrawCommand {
            kind: CommandKind::Image {
                image: Arc::clone(image),
                source,
            },
            x: ix - cx,
            y: iy - cy,
            color: color.unwrap_or_default(),
            effective_y: iy,
        });
    }

    /// Queues the whole image, untinted.
    pub fn sprite(&mut self, image: &ImageHandle, x: f32, y: f32, ox: f32, oy: f32) {
        self.raw(image, x, y, ox, oy, None, None);
    }

    /// Queues one cell of a `rows` × `cols` sprite sheet.
    #[allow(clippy::too_many_arguments)]
    pub fn tile(
        &mut self,
        image: &ImageHandle,
        x: f32,
        y: f32,
        ox: f32,
        oy: f32,
        index: u32,
        rows: u32,
        cols: u32,
        color: Option<Rgba>,
    ) {
        let source = tile_source(image.width(), image.height(), index, rows, cols);
        self.raw(image, x, y, ox, oy, Some(source), color);
    }

    /// Queues a 1-pixel line between two world-space points.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        let (cx, cy) = self.camera.origin();
        self.commands.push(DrawCommand {
            kind: CommandKind::Line {
                x1: x1 - cx,
                y1: y1 - cy,
            },
            x: x0 - cx,
            y: y0 - cy,
            color,
            effective_y: y0.min(y1),
        });
    }

    /// Queues a raw pixel write. Alpha is ignored; the pixel lands opaque.
    pub fn pixel(&mut self, x: f32, y: f32, color: Rgba) {
        let (cx, cy) = self.camera.origin();
        self.commands.push(DrawCommand {
            kind: CommandKind::Pixel,
            x: x - cx,
            y: y - cy,
            color,
            effective_y: y,
        });
    }

    /// Fills the back-buffer with an opaque color, immediately.
    pub fn clear(&mut self, color: Rgba) {
        self.back_buffer.fill(color);
    }

    /// Same as [`Renderer::clear`] with 0–255 channels.
    pub fn clear_rgb8(&mut self, r: u8, g: u8, b: u8) {
        self.clear(Rgba::from_rgb8(r, g, b));
    }

    /// Sorts, culls, composites and presents every pending command, then empties the list.
    pub fn flush(&mut self, sort: SortMode) -> FlushStats {
        self.flush_with(sort.into())
    }

    /// Like [`Renderer::flush`] with a caller-supplied ordering. The sort is stable.
    pub fn flush_sorted_by<F>(&mut self, compare: F) -> FlushStats
    where
        F: FnMut(&DrawCommand, &DrawCommand) -> Ordering,
    {
        self.commands.sort_by(compare);
        self.composite_and_present()
    }

    pub fn flush_with(&mut self, options: FlushOptions) -> FlushStats {
        options.sort.apply(&mut self.commands);
        let stats = self.composite_and_present();
        if let Some(apply) = options.apply_camera {
            self.camera.set_apply(apply);
        }
        stats
    }

    fn composite_and_present(&mut self) -> FlushStats {
        let commands = std::mem::take(&mut self.commands);
        let (width, height) = (self.width(), self.height());

        let mut drawn = 0;
        for cmd in commands
            .iter()
            .filter(|cmd| is_visible(cmd.bounds(), width, height))
        {
            self.draw_command(cmd);
            drawn += 1;
        }

        self.presenter.present(&self.back_buffer, self.pixel_size);

        let stats = FlushStats {
            submitted: commands.len(),
            culled: commands.len() - drawn,
            drawn,
        };
        log::trace!(
            "Flushed {} commands: {} drawn, {} culled",
            stats.submitted,
            stats.drawn,
            stats.culled
        );
        stats
    }

    fn draw_command(&mut self, cmd: &DrawCommand) {
        let x = cmd.x.floor() as i32;
        let y = cmd.y.floor() as i32;
        match &cmd.kind {
            CommandKind::Image { image, source } => match self.compositing {
                Compositing::Blend => self.back_buffer.blit(image, *source, x, y, cmd.color.a),
                Compositing::Cutout { threshold } => {
                    self.back_buffer
                        .blit_cutout(image, *source, x, y, cmd.color, threshold)
                }
            },
            CommandKind::Line { x1, y1 } => {
                self.back_buffer.draw_line(cmd.x, cmd.y, *x1, *y1, cmd.color)
            }
            CommandKind::Pixel => {
                let [r, g, b, _] = cmd.color.to_rgba8();
                self.back_buffer.put_pixel(x, y, [r, g, b]);
            }
        }
    }
}
