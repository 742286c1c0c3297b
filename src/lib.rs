//! Render a GeoJSON land dataset as an animated orthographic globe.
//!
//! Each frame projects the dataset onto an orthographic plane centered on
//! the next longitude of the sweep, paints ocean, outline and land with
//! tiny-skia, and quantizes the result onto the Plan 9 palette. The frames
//! are written as one looping GIF with a global color table.

pub mod animation;
pub mod config;
pub mod domain;
pub mod input;
pub mod palette;
pub mod pipeline;
pub mod projection;
pub mod render;
