//! Frame rendering module
//!
//! This module contains:
//! - Per-frame geometry: globe outline, projection, sub-path splitting (geometry.rs)
//! - Rasterization of that geometry using tiny-skia (canvas.rs)

pub mod canvas;
pub mod geometry;

pub use canvas::{Canvas, FrameStyle};
pub use geometry::{FrameGeometry, FrameTransform, build_frame};
