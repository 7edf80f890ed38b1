//! # Rendering Module
//!
//! Deferred command rendering onto a low-resolution back-buffer.
//!
//! Draw calls made during a frame are queued as [`DrawCommand`]s. A single
//! [`Renderer::flush`] per frame sorts them, culls what falls outside the back-buffer,
//! composites the rest and hands the result to a [`Presenter`] for nearest-neighbor
//! upscaling.

pub mod bitmap;
pub mod camera;
pub mod color;
pub mod command;
pub mod present;
pub mod renderer;

pub use bitmap::*;
pub use camera::*;
pub use color::*;
pub use command::*;
pub use present::*;
pub use renderer::*;
