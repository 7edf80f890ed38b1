//! # Game Module
//!
//! The frame loop and the building blocks games are made of:
//! - Entities with lifecycle hooks, updated and drawn in insertion order
//! - Fixed-rate timers and named-clip animators
//! - The [`Framework`] that ties rendering, content and input together

pub mod animator;
pub mod entity;
pub mod framework;
pub mod timer;

pub use animator::*;
pub use entity::*;
pub use framework::*;
pub use timer::*;
