//! # Utilities Module
//!
//! Stateless helpers shared by games built on the framework.

pub mod math;

pub use math::*;
