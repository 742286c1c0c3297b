//! Batch transformation between two coordinate systems

use geo_types::Coord;

use super::definition::CoordinateSystem;
use super::error::ProjectionError;
use super::ortho::Orthographic;

/// Latitude slack accepted past the poles
const LAT_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
enum Operation {
    Identity,
    Forward(Orthographic),
    Inverse(Orthographic),
}

/// A source → target transformation applied in place to point batches.
///
/// Points that end up on the hidden hemisphere are written as
/// `(INFINITY, INFINITY)`; already non-finite inputs pass through untouched.
#[derive(Debug, Clone)]
pub struct Transformation {
    operation: Operation,
}

impl Transformation {
    pub fn new(
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Result<Self, ProjectionError> {
        if !source.ellipsoid().same_as(target.ellipsoid()) {
            return Err(ProjectionError::Unsupported(
                "transformation between different ellipsoids".to_string(),
            ));
        }

        let operation = match (source, target) {
            (CoordinateSystem::LongLat { .. }, CoordinateSystem::LongLat { .. }) => {
                Operation::Identity
            }
            (
                CoordinateSystem::LongLat { .. },
                CoordinateSystem::Orthographic {
                    ellipsoid,
                    lat_0,
                    lon_0,
                },
            ) => Operation::Forward(Orthographic::new(ellipsoid.semi_major, *lon_0, *lat_0)),
            (
                CoordinateSystem::Orthographic {
                    ellipsoid,
                    lat_0,
                    lon_0,
                },
                CoordinateSystem::LongLat { .. },
            ) => Operation::Inverse(Orthographic::new(ellipsoid.semi_major, *lon_0, *lat_0)),
            (CoordinateSystem::Orthographic { .. }, CoordinateSystem::Orthographic { .. }) => {
                return Err(ProjectionError::Unsupported(
                    "orthographic to orthographic".to_string(),
                ));
            }
        };

        Ok(Self { operation })
    }

    /// Transform `points` in place. Geographic coordinates are radians.
    pub fn transform_points(&self, points: &mut [Coord<f64>]) -> Result<(), ProjectionError> {
        for (index, point) in points.iter_mut().enumerate() {
            if point.x.is_nan() || point.y.is_nan() {
                return Err(ProjectionError::PointOutOfRange {
                    index,
                    x: point.x,
                    y: point.y,
                });
            }
            if point.x.is_infinite() || point.y.is_infinite() {
                continue;
            }

            match self.operation {
                Operation::Identity => {}
                Operation::Forward(ortho) => {
                    if point.y.abs() > std::f64::consts::FRAC_PI_2 + LAT_TOLERANCE {
                        return Err(ProjectionError::PointOutOfRange {
                            index,
                            x: point.x,
                            y: point.y,
                        });
                    }
                    let (x, y) = ortho
                        .forward(point.x, point.y)
                        .unwrap_or((f64::INFINITY, f64::INFINITY));
                    *point = Coord { x, y };
                }
                Operation::Inverse(ortho) => {
                    let (lon, lat) = ortho.inverse(point.x, point.y).ok_or(
                        ProjectionError::PointOutOfRange {
                            index,
                            x: point.x,
                            y: point.y,
                        },
                    )?;
                    *point = Coord { x: lon, y: lat };
                }
            }
        }
        Ok(())
    }
}
