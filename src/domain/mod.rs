//! Pure domain types with minimal dependencies
//!
//! Geographic features, their rings, and the rotation sweep that drives
//! the animation. Nothing here knows about projection or drawing.

pub mod geometry;
pub mod sweep;

pub use geometry::*;
pub use sweep::*;
