//! Input dataset loading
//!
//! This module contains:
//! - GeoJSON decoding into features and rings (geojson.rs)

pub mod geojson;

pub use self::geojson::{load_features, parse_features};
