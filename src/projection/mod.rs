//! Coordinate projection
//!
//! This module contains:
//! - proj.4 definition parsing with init-file lookup (definition.rs)
//! - Spherical orthographic math (ortho.rs)
//! - In-place batch transformations (transform.rs)

pub mod definition;
pub mod error;
pub mod ortho;
pub mod transform;

pub use definition::{CoordinateSystem, Ellipsoid, SearchPath, WGS84_SEMI_MAJOR};
pub use error::ProjectionError;
pub use transform::Transformation;

/// Orthographic definition for a globe centered on `center_lon_deg` at the equator
pub fn ortho_definition(center_lon_deg: f64) -> String {
    format!(
        "+proj=ortho +a=6378137.0 +rf=298.257223563 +towgs84=0,0,0,0,0,0,0 +lat_0={:.6} +lon_0={:.6}",
        0.0, center_lon_deg
    )
}

/// Builds per-rotation transformations from one geographic source system
#[derive(Debug, Clone)]
pub struct Projector {
    source: CoordinateSystem,
    search_path: SearchPath,
}

impl Projector {
    pub fn new(source_definition: &str, search_path: SearchPath) -> Result<Self, ProjectionError> {
        let source = CoordinateSystem::from_proj_string(source_definition, &search_path)?;
        if !matches!(source, CoordinateSystem::LongLat { .. }) {
            return Err(ProjectionError::Unsupported(format!(
                "source system `{}` is not geographic",
                source_definition
            )));
        }
        Ok(Self {
            source,
            search_path,
        })
    }

    /// Transformation onto the orthographic plane centered on `center_lon_deg`
    pub fn for_rotation(&self, center_lon_deg: f64) -> Result<Transformation, ProjectionError> {
        let definition = ortho_definition(center_lon_deg);
        log::debug!("{}", definition);
        let target = CoordinateSystem::from_proj_string(&definition, &self.search_path)?;
        Transformation::new(&self.source, &target)
    }
}
